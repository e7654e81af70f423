//! Protobuf messages of the `proto.WriteService` gRPC service.
//!
//! ```text
//! service WriteService {
//!   rpc Write(WriteRequest) returns (WriteResponse);
//!   rpc Ping(PingRequest) returns (PingResponse);
//! }
//! ```

/// A batch of encoded records for one database.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WriteRequest {
    /// Protocol version.
    #[prost(uint32, tag = "1")]
    pub version: u32,
    /// Target database.
    #[prost(string, tag = "2")]
    pub database: ::prost::alloc::string::String,
    /// Target retention policy; empty selects the default.
    #[prost(string, tag = "3")]
    pub retention_policy: ::prost::alloc::string::String,
    /// Username for password authentication.
    #[prost(string, tag = "4")]
    pub username: ::prost::alloc::string::String,
    /// Password for password authentication.
    #[prost(string, tag = "5")]
    pub password: ::prost::alloc::string::String,
    /// One block per measurement.
    #[prost(message, repeated, tag = "6")]
    pub records: ::prost::alloc::vec::Vec<RecordBlock>,
}

/// One measurement's marshaled record plus its time range.
///
/// This is the `proto.Record` message.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RecordBlock {
    /// Measurement name.
    #[prost(string, tag = "1")]
    pub measurement: ::prost::alloc::string::String,
    /// Smallest timestamp in the block.
    #[prost(int64, tag = "2")]
    pub min_time: i64,
    /// Largest timestamp in the block.
    #[prost(int64, tag = "3")]
    pub max_time: i64,
    /// Compression applied to `block`.
    #[prost(enumeration = "CompressMethod", tag = "4")]
    pub compress_method: i32,
    /// Marshaled record bytes.
    #[prost(bytes = "vec", tag = "5")]
    pub block: ::prost::alloc::vec::Vec<u8>,
}

/// Server answer to a write.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WriteResponse {
    /// Zero on success, non-zero for partial or total failure.
    #[prost(enumeration = "ResponseCode", tag = "1")]
    pub code: i32,
}

/// Liveness probe.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PingRequest {
    /// Caller identifier.
    #[prost(string, tag = "1")]
    pub client_id: ::prost::alloc::string::String,
}

/// Liveness probe answer.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PingResponse {
    /// Reported server status.
    #[prost(enumeration = "ServerStatus", tag = "1")]
    pub status: i32,
}

/// Compression applied to a record block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum CompressMethod {
    /// Raw record bytes.
    Uncompressed = 0,
    /// LZ4, fast mode.
    Lz4Fast = 1,
    /// Zstandard, fast mode.
    ZstdFast = 2,
    /// Snappy.
    Snappy = 3,
}

/// Write outcome reported by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ResponseCode {
    /// Every record was written.
    Success = 0,
    /// Some records were written.
    Partial = 1,
    /// Nothing was written.
    Failed = 2,
}

/// Server health reported by ping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ServerStatus {
    /// Serving.
    Up = 0,
    /// Not serving.
    Down = 1,
    /// Status could not be determined.
    Unknown = 99,
}
