pub mod camera;
pub mod config;
pub mod edit_mode;
pub mod geometry;
pub mod highlight;
pub mod input;
pub mod picker;
pub mod placement;
pub mod room;
pub mod session;
pub mod transport;

pub use camera::{Camera, CameraController, Viewport};
pub use config::{ConfigError, EngineConfig};
pub use edit_mode::{
    EditEvent, EditModeError, EditModeKind, EditModeStateMachine, EditSnapshot, EditState,
};
pub use geometry::{
    elevation_px, grid_to_screen, screen_to_grid, screen_to_world, snap_to_grid, world_to_screen,
    Footprint, GridPos, Point, Rotation, VisualPosition, HEIGHT_PX_PER_UNIT, TILE_H_HALF,
    TILE_W_HALF,
};
pub use highlight::{HighlightColor, HighlightIntent, HighlightOverlay};
pub use input::{InputAction, PointerButton};
pub use picker::{DrawOrderKey, PickTarget, Picker, ScreenRect};
pub use placement::{PlacementRejection, PlacementReport, PlacementValidator, StackLimits};
pub use room::{
    Character, CharacterId, CharacterKind, CharacterStore, DefinitionCatalog, DefinitionId,
    FurnitureDefinition, Interaction, LayoutError, ObjectId, ObjectStore, Occupancy,
    PlaceableObject, Room, RoomId, RoomLayout, TileType, MAX_ROOM_DIMENSION,
};
pub use session::{RoomSession, SessionError, SessionPlacementError};
pub use transport::{
    CharacterDto, CharacterPatch, InboundError, MoveTarget, ObjectDto, ObjectPatch, RoomBuild,
    RoomEvent, RoomSnapshot, TransportRequest,
};
