pub mod destinations_model;

pub use destinations_model::{
    Destination, DestinationCreate, DestinationUpdate, DestinationView, TestDestinationConnection,
};
