use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::error::{PlanError, Result};

/// Single-flight guard for user-triggered plan generation.
///
/// A second submit while a permit is held fails fast with
/// [`PlanError::InFlight`] instead of starting a parallel backend call.
#[derive(Debug, Clone, Default)]
pub struct GenerationGate {
    busy: Arc<AtomicBool>,
}

/// Held for the duration of one generation; releases the gate on drop.
#[derive(Debug)]
pub struct GatePermit {
    busy: Arc<AtomicBool>,
}

impl GenerationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Result<GatePermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| PlanError::InFlight)?;
        Ok(GatePermit {
            busy: Arc::clone(&self.busy),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_while_held() {
        let gate = GenerationGate::new();
        let permit = gate.try_acquire().unwrap();

        assert!(gate.is_busy());
        assert!(matches!(
            gate.clone().try_acquire(),
            Err(PlanError::InFlight)
        ));

        drop(permit);
        assert!(!gate.is_busy());
        assert!(gate.try_acquire().is_ok());
    }
}
