//! Number inventory entity and the gateway telemetry payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A SIM/number inventory record.
///
/// The telemetry fields (`port`, `iccid`, `imsi`, `operator`, `signal`,
/// `locked`, `active`, `last_rotation`) are owned by the gateway
/// reconciliation poller; `multi_use`/`multi_gap` are user-managed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Number {
    /// Unique identifier for the record
    pub id: Uuid,

    /// Phone number (unique key, digits only)
    pub number: String,

    /// Country this number belongs to
    pub country_id: Uuid,

    /// Whether the number may serve multiple orders
    pub multi_use: bool,

    /// Gap between multi-use captures, in seconds
    pub multi_gap: u32,

    /// Whether the SIM is live on the gateway
    pub active: bool,

    /// Port lock state derived from the feed
    pub locked: bool,

    /// Last time this number/port was rotated
    pub last_rotation: Option<DateTime<Utc>>,

    /// SIM card ICCID
    pub iccid: Option<String>,

    /// SIM IMSI
    pub imsi: Option<String>,

    /// Network operator name (e.g. Vi, Airtel, Jio)
    pub operator: Option<String>,

    /// Last known signal strength
    pub signal: u32,

    /// Gateway port id, e.g. "1.01"
    pub port: Option<String>,
}

impl Number {
    /// Creates a new inventory record from a telemetry snapshot
    pub fn from_telemetry(telemetry: &PortTelemetry) -> Self {
        Self {
            id: Uuid::new_v4(),
            number: telemetry.number.clone(),
            country_id: telemetry.country_id,
            multi_use: false,
            multi_gap: 0,
            active: telemetry.active,
            locked: telemetry.locked,
            last_rotation: Some(telemetry.last_rotation),
            iccid: telemetry.iccid.clone(),
            imsi: telemetry.imsi.clone(),
            operator: telemetry.operator.clone(),
            signal: telemetry.signal,
            port: telemetry.port.clone(),
        }
    }

    /// Applies a telemetry snapshot to an existing record
    pub fn apply_telemetry(&mut self, telemetry: &PortTelemetry) {
        self.country_id = telemetry.country_id;
        self.active = telemetry.active;
        self.locked = telemetry.locked;
        self.last_rotation = Some(telemetry.last_rotation);
        self.iccid = telemetry.iccid.clone();
        self.imsi = telemetry.imsi.clone();
        self.operator = telemetry.operator.clone();
        self.signal = telemetry.signal;
        self.port = telemetry.port.clone();
    }
}

/// Per-port telemetry snapshot derived from one gateway feed entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortTelemetry {
    /// Phone number reported by the SIM
    pub number: String,

    /// Country to file the number under
    pub country_id: Uuid,

    /// Gateway port id
    pub port: Option<String>,

    /// SIM card ICCID
    pub iccid: Option<String>,

    /// SIM IMSI
    pub imsi: Option<String>,

    /// Network operator name
    pub operator: Option<String>,

    /// Signal strength; forced to zero for inactive ports
    pub signal: u32,

    /// Inverse of the feed's active-port flag
    pub locked: bool,

    /// Reconciliation timestamp
    pub last_rotation: DateTime<Utc>,

    /// Whether the port status code classifies as active
    pub active: bool,
}
