pub mod culture;
pub mod entity;
pub mod repository;
pub mod schedule;

pub use culture::{CultureImpact, CultureImpactFactory};
pub use entity::{
    ContentStatus, ContentVariation, Document, INVARIANT_CULTURE, ROOT_ID, WILDCARD_CULTURE,
};
pub use repository::{DocumentRepository, PersistMode};
pub use schedule::{ContentSchedule, ContentScheduleCollection, ScheduleAction};
