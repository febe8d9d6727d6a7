pub mod connections_model;

pub use connections_model::{
    Connection, ConnectionCreate, ConnectionUpdate, ConnectionView, ScheduleType,
};
