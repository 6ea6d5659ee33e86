pub mod grid;
pub mod layout;
pub mod scroll;
pub mod tableview;
pub mod viewport;

pub use grid::Grid;
pub use tableview::TableView;
