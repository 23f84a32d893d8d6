pub mod collection_date;
pub mod collection_request;
pub mod collector;
pub mod household;

pub use collection_date::CollectionDate;
pub use collection_request::{
    CollectionRequest, CreateCollectionRequest, NewCollectionRequest, RequestStatus,
    UpdateCollectionRequest,
};
pub use collector::Collector;
pub use household::{Household, NewHousehold};
