//! Shared scene store.
//!
//! Render workers read the scene while editors change it. The store keeps
//! the published scene behind an `Arc` and only ever swaps in complete
//! scenes: a reader holds whichever snapshot it took for the duration of a
//! render and never sees a half-loaded scene.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};

use thiserror::Error;

use crate::scene::Scene;
use crate::text::{parse_scene, write_scene, ParseError};

/// Errors reported by scene save/open.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scene file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Thread-safe owner of the current scene.
#[derive(Debug)]
pub struct SceneStore {
    current: RwLock<Arc<Scene>>,
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new(Scene::default())
    }
}

impl SceneStore {
    /// Create a store publishing `scene`.
    pub fn new(scene: Scene) -> Self {
        Self {
            current: RwLock::new(Arc::new(scene)),
        }
    }

    /// Take a consistent snapshot of the current scene.
    pub fn snapshot(&self) -> Arc<Scene> {
        // A poisoned lock still guards a complete Arc, so keep serving it
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Publish a fully built scene, replacing the current one.
    pub fn replace(&self, scene: Scene) {
        let scene = Arc::new(scene);
        match self.current.write() {
            Ok(mut guard) => *guard = scene,
            Err(poisoned) => *poisoned.into_inner() = scene,
        }
    }

    /// Apply an in-place edit and publish the result.
    ///
    /// The edit runs on a private copy when a render still holds the current
    /// snapshot, so in-flight renders keep a stable scene.
    pub fn edit<R>(&self, f: impl FnOnce(&mut Scene) -> R) -> R {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(Arc::make_mut(&mut guard))
    }

    /// Write the current scene to `path`.
    pub fn save_to(&self, path: impl AsRef<Path>) -> StoreResult<()> {
        let path = path.as_ref();
        let text = write_scene(&self.snapshot());
        fs::write(path, text).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Saved scene to {}", path.display());
        Ok(())
    }

    /// Load a scene from `path` and publish it.
    ///
    /// The new scene is parsed off to the side; on failure the current scene
    /// is left untouched.
    pub fn open_from(&self, path: impl AsRef<Path>) -> StoreResult<()> {
        let path = path.as_ref();
        let scene = load_scene(path)?;
        log::info!(
            "Opened scene {}: {} spheres, {} planes, {} lights",
            path.display(),
            scene.sphere_count(),
            scene.plane_count(),
            scene.light_count()
        );
        self.replace(scene);
        Ok(())
    }

    /// Save on a background thread and report the outcome to `on_complete`.
    ///
    /// The callback runs once, on the background thread. Dropping the
    /// returned handle detaches the task. If the thread cannot be spawned the
    /// callback is dropped unrun and the spawn error is returned.
    pub fn save<F>(
        self: &Arc<Self>,
        path: impl Into<PathBuf>,
        on_complete: F,
    ) -> io::Result<JoinHandle<()>>
    where
        F: FnOnce(StoreResult<()>) + Send + 'static,
    {
        let store = Arc::clone(self);
        let path = path.into();
        spawn_io("mint-save", move || on_complete(store.save_to(&path)))
    }

    /// Open on a background thread and report the outcome to `on_complete`.
    pub fn open<F>(
        self: &Arc<Self>,
        path: impl Into<PathBuf>,
        on_complete: F,
    ) -> io::Result<JoinHandle<()>>
    where
        F: FnOnce(StoreResult<()>) + Send + 'static,
    {
        let store = Arc::clone(self);
        let path = path.into();
        spawn_io("mint-open", move || on_complete(store.open_from(&path)))
    }
}

/// Read and parse a scene file without publishing it anywhere.
pub fn load_scene(path: impl AsRef<Path>) -> StoreResult<Scene> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_scene(&text).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn spawn_io(name: &str, task: impl FnOnce() + Send + 'static) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(name.to_string())
        .spawn(task)
        .inspect_err(|err| log::warn!("Could not spawn {} thread: {}", name, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Light, Sphere};
    use mint_math::{Color, Vec3};
    use std::sync::mpsc;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("mint_store_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_snapshot_is_stable_across_edits() {
        let store = SceneStore::default();
        let before = store.snapshot();

        store.edit(|scene| scene.spheres[0].radius = 9.0);

        assert_eq!(before.spheres[0].radius, 2.0);
        assert_eq!(store.snapshot().spheres[0].radius, 9.0);
    }

    #[test]
    fn test_edit_returns_closure_value() {
        let store = SceneStore::default();
        let count = store.edit(|scene| {
            scene.add_light(Light::directional(Vec3::ZERO, Color::ONE));
            scene.light_count()
        });
        assert_eq!(count, 2);
    }

    #[test]
    fn test_replace_swaps_whole_scene() {
        let store = SceneStore::default();
        let held = store.snapshot();

        let mut scene = Scene::empty();
        scene.add_sphere(Sphere::new(1.0, Vec3::ZERO, 0));
        store.replace(scene);

        assert_eq!(held.sphere_count(), 3);
        assert_eq!(store.snapshot().sphere_count(), 1);
    }

    #[test]
    fn test_save_then_open_roundtrip() {
        init_logger();
        let path = temp_path("roundtrip.scene");
        let store = SceneStore::default();
        store.edit(|scene| scene.fresnel_power = 4.5);
        store.save_to(&path).unwrap();

        let other = SceneStore::new(Scene::empty());
        other.open_from(&path).unwrap();
        assert_eq!(*other.snapshot(), *store.snapshot());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_failed_open_keeps_current_scene() {
        let path = temp_path("broken.scene");
        fs::write(&path, "2\n2\nnot-a-number\n").unwrap();

        let store = SceneStore::default();
        let err = store.open_from(&path).unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
        assert_eq!(*store.snapshot(), Scene::default());

        let missing = store.open_from(temp_path("does_not_exist.scene"));
        assert!(matches!(missing, Err(StoreError::Io { .. })));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_async_save_and_open_report_completion() {
        let path = temp_path("async.scene");
        let store = Arc::new(SceneStore::default());
        let (tx, rx) = mpsc::channel();

        let tx_save = tx.clone();
        store
            .save(&path, move |result| tx_save.send(result.is_ok()).unwrap())
            .unwrap()
            .join()
            .unwrap();
        assert!(rx.recv().unwrap());

        let other = Arc::new(SceneStore::new(Scene::empty()));
        other
            .open(&path, move |result| tx.send(result.is_ok()).unwrap())
            .unwrap()
            .join()
            .unwrap();
        assert!(rx.recv().unwrap());
        assert_eq!(other.snapshot().sphere_count(), 3);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_async_open_failure_is_reported() {
        let store = Arc::new(SceneStore::default());
        let (tx, rx) = mpsc::channel();
        store
            .open(temp_path("missing_async.scene"), move |result| {
                tx.send(result.is_err()).unwrap()
            })
            .unwrap()
            .join()
            .unwrap();
        assert!(rx.recv().unwrap());
    }
}
