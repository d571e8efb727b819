// Public library interface for trimap
// The binaries drive the same modules: records → tree → layout → render

pub mod error;
pub mod layout;
pub mod render;
pub mod tree;

pub use error::{LayoutError, RecordError};
pub use layout::{compute_layout, Layout, LayoutConfig, Point, SplitMode, Triangle};
pub use tree::arena::{NodeId, WeightedNode, WeightedTree};

/// Default container: an equilateral triangle with side `size`, base on the x axis.
pub fn equilateral(size: f64) -> Triangle {
    Triangle::new(
        Point::new(0.0, 0.0),
        Point::new(size, 0.0),
        Point::new(size * 0.5, size * 3f64.sqrt() * 0.5),
    )
}
