//! gRPC write path.
//!
//! Points are grouped by measurement, each group is unified into one
//! [`Record`](crate::record::Record) and marshaled into a [`RecordBlock`].
//!
//! ```text
//! BatchPoints → group by measurement → RecordTransform per group
//!   → Record::marshal → RecordBlock → WriteRequest → WriteService
//! ```
//!
//! The network transport is abstracted behind [`WriteService`]; a response
//! code of `0` is success and anything else fails the whole batch.

pub mod config;
pub mod proto;

pub use config::{Address, AuthConfig, AuthType, GrpcConfig};
pub use proto::{
    CompressMethod, PingRequest, PingResponse, RecordBlock, ResponseCode, ServerStatus,
    WriteRequest, WriteResponse,
};

use crate::error::{ClientError, Result};
use crate::point::BatchPoints;
use crate::record::RecordTransform;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Transport for the `proto.WriteService` RPCs.
pub trait WriteService {
    /// Sends a write request.
    fn write(&self, request: WriteRequest) -> Result<WriteResponse>;

    /// Sends a liveness probe.
    fn ping(&self, request: PingRequest) -> Result<PingResponse>;
}

/// Builds the write request for a batch.
///
/// Measurements appear in the order of their first point in the batch.
///
/// # Errors
///
/// Returns [`ClientError::Config`] for an empty database name, and any
/// error raised while unifying a measurement's points.
pub fn build_write_request(
    database: &str,
    batch: &BatchPoints,
    config: &GrpcConfig,
) -> Result<WriteRequest> {
    if database.is_empty() {
        return Err(ClientError::Config("empty database name".to_string()));
    }

    let mut groups: Vec<(&str, RecordTransform)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for point in &batch.points {
        let i = *index.entry(point.measurement.as_str()).or_insert_with(|| {
            groups.push((point.measurement.as_str(), RecordTransform::new()));
            groups.len() - 1
        });
        groups[i].1.add_point(point)?;
    }

    let mut records = Vec::with_capacity(groups.len());
    for (measurement, mut transform) in groups {
        let record = transform.convert_to_record()?;
        // blocks carry the raw record bytes
        records.push(RecordBlock {
            measurement: measurement.to_owned(),
            min_time: transform.min_time(),
            max_time: transform.max_time(),
            compress_method: CompressMethod::Uncompressed as i32,
            block: record.to_bytes(),
        });
    }

    let (username, password) = config.credentials();
    debug!(
        "Built write request for database {} with {} records from {} points",
        database,
        records.len(),
        batch.len()
    );

    Ok(WriteRequest {
        version: config.version,
        database: database.to_owned(),
        retention_policy: config.retention_policy.clone(),
        username: username.to_owned(),
        password: password.to_owned(),
        records,
    })
}

/// Maps a write response code to a result; only `0` is success.
pub fn check_response(response: &WriteResponse) -> Result<()> {
    if response.code == ResponseCode::Success as i32 {
        return Ok(());
    }
    warn!("Write rejected by server with code {}", response.code);
    Err(ClientError::Write {
        code: response.code,
    })
}

/// Writes point batches through a [`WriteService`].
#[derive(Debug)]
pub struct RecordWriter<S> {
    service: S,
    config: GrpcConfig,
}

impl<S: WriteService> RecordWriter<S> {
    /// Creates a writer after validating `config`.
    pub fn new(service: S, config: GrpcConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { service, config })
    }

    /// The writer's configuration.
    pub fn config(&self) -> &GrpcConfig {
        &self.config
    }

    /// The underlying transport.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Encodes and sends a batch.
    ///
    /// An empty batch is accepted without contacting the server.
    pub fn write(&self, database: &str, batch: &BatchPoints) -> Result<()> {
        if database.is_empty() {
            return Err(ClientError::Config("empty database name".to_string()));
        }
        if batch.is_empty() {
            debug!("Skipping write of empty batch to {}", database);
            return Ok(());
        }
        let request = build_write_request(database, batch, &self.config)?;
        let response = self.service.write(request)?;
        check_response(&response)
    }

    /// Probes the server and returns its reported status.
    pub fn ping(&self, client_id: &str) -> Result<ServerStatus> {
        let response = self.service.ping(PingRequest {
            client_id: client_id.to_owned(),
        })?;
        Ok(response.status())
    }
}
