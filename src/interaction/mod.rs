//! Interactive positioning: live drag feedback, placement of new nodes, and
//! repair of layouts edited out of band.

mod drag;
mod placement;

pub use drag::{DragOptions, DragResult, GuideAxis, SnapGuide, handle_drag_position};
pub use placement::{
    PlacementContext, PlacementDirection, PlacementResult, REMOVAL_RESPACE_RATIO, maintain_integrity,
    position_new_node,
};
