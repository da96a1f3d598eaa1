pub mod catalog;
pub mod resolver;

pub use catalog::{ItemCatalog, ItemKey, ItemSpec};
pub use resolver::{
    ProjectedItem, Projection, Shape, project, project_call, project_call_item, project_event,
    project_item, resolve,
};
