pub mod client;
pub mod connection;
pub mod error;
pub mod memory;
pub mod model;
pub mod operation;
pub mod table;

pub use client::{Aggregate, Batch, Client, Collection, Collections, Data, Query};
pub use connection::{Connection, Transport};
pub use error::ClientError;
pub use memory::InMemoryTransport;
pub use model::{
    AggregateReturn, BatchError, BatchReturn, CollectionConfig, DataObject, DeleteManyReturn,
    Filter, ObjectMetadata, Properties, QueryObject, QueryReturn,
};
pub use operation::{names, Operation, OperationHandle, Request, Response, TransportOperation};
pub use table::{OperationTable, OperationTableBuilder, Resolution};
