#![doc = include_str!("../README.md")]

pub mod config;
pub mod pipeline;

pub use chipviz_boundary as boundary;
pub use chipviz_helpers as helpers;
pub use chipviz_parse as parse;
pub use chipviz_tour as tour;
pub use chipviz_traits::*;

pub use config::{read_configuration, read_configuration_str, BoundaryConfig};

pub mod prelude {
    pub use crate::config::*;
    pub use crate::pipeline::*;
    pub use chipviz_boundary::*;
    pub use chipviz_helpers::*;
    pub use chipviz_parse::*;
    pub use chipviz_tour::*;
    pub use chipviz_traits::*;
}
