//! Plain-text scene format.
//!
//! The format is line oriented and ASCII only:
//!
//! ```text
//! 2                 reflection bounce count
//! 2                 refraction bounce count
//! 3                 Fresnel power
//! #Materials
//! ar,ag,ab dr,dg,db sr,sg,sb glossiness reflectivity refractivity
//! #Lights
//! px,py,pz r,g,b            directional light
//! px,py,pz r,g,b radius     point light
//! #Spheres
//! radius cx,cy,cz material
//! #Planes
//! nx,ny,nz d material
//! #End
//! ```
//!
//! Vectors are comma-joined triples and fields are separated by whitespace.
//! There is no quoting, escaping or versioning, so the reader and the writer
//! in this module must change together.

mod parser;
mod writer;

pub use parser::*;
pub use writer::*;

/// Sections of a scene file, in the order they must appear.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Materials,
    Lights,
    Spheres,
    Planes,
    End,
}

impl Section {
    /// Marker line that opens this section.
    pub fn marker(self) -> &'static str {
        match self {
            Section::Materials => "#Materials",
            Section::Lights => "#Lights",
            Section::Spheres => "#Spheres",
            Section::Planes => "#Planes",
            Section::End => "#End",
        }
    }

    /// The section that follows this one, if any.
    pub fn next(self) -> Option<Section> {
        match self {
            Section::Materials => Some(Section::Lights),
            Section::Lights => Some(Section::Spheres),
            Section::Spheres => Some(Section::Planes),
            Section::Planes => Some(Section::End),
            Section::End => None,
        }
    }
}
