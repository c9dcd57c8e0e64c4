use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::error::CaptureError;

/// Registry of capture devices currently held by a session.
///
/// Sessions that share a registry (by cloning it) cannot record from the
/// same device at the same time. The registry is an explicit value owned by
/// the orchestrator, not process-wide state.
#[derive(Debug, Clone, Default)]
pub struct DeviceClaims {
    claimed: Arc<Mutex<HashSet<String>>>,
}

impl DeviceClaims {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `device_id`, failing with `CaptureError::Busy` if another
    /// session already holds it. The claim lasts until the guard is dropped.
    pub fn claim(&self, device_id: &str) -> Result<DeviceClaim, CaptureError> {
        let mut claimed = self.claimed.lock();
        if !claimed.insert(device_id.to_string()) {
            return Err(CaptureError::Busy(format!(
                "device '{}' is already recording",
                device_id
            )));
        }
        Ok(DeviceClaim {
            device_id: device_id.to_string(),
            claimed: Arc::clone(&self.claimed),
        })
    }

    pub fn is_claimed(&self, device_id: &str) -> bool {
        self.claimed.lock().contains(device_id)
    }
}

/// RAII guard for one claimed device.
#[derive(Debug)]
pub struct DeviceClaim {
    device_id: String,
    claimed: Arc<Mutex<HashSet<String>>>,
}

impl DeviceClaim {
    pub fn device_id(&self) -> &str {
        &self.device_id
    }
}

impl Drop for DeviceClaim {
    fn drop(&mut self) {
        self.claimed.lock().remove(&self.device_id);
    }
}
