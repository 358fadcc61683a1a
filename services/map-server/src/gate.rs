//! Exclusive access to the shared dataset handle.
//!
//! Every render resamples the tile and computes color bounds against the
//! same mutable dataset, so those steps run one request at a time. Callers
//! block on a mutex; async handlers reach this from `spawn_blocking`, never
//! from a reactor thread.

use std::sync::Mutex;
use std::time::Instant;

use dataset::Dataset;
use map_common::{MapError, MapResult};
use metrics::histogram;
use tracing::error;

/// Mutual exclusion over one dataset handle.
pub struct DatasetGate<D: ?Sized + Send = dyn Dataset> {
    inner: Mutex<Box<D>>,
}

impl<D: ?Sized + Send> DatasetGate<D> {
    pub fn new(dataset: Box<D>) -> Self {
        Self {
            inner: Mutex::new(dataset),
        }
    }

    /// Run `f` while holding the dataset exclusively.
    ///
    /// The gate is released when `f` returns or unwinds. If an earlier
    /// holder panicked the call fails with `ResourceFault` and the gate is
    /// cleared, so later requests proceed normally.
    pub fn with_exclusive<T>(&self, f: impl FnOnce(&mut D) -> MapResult<T>) -> MapResult<T> {
        let waiting = Instant::now();
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(_) => {
                error!("Dataset gate was poisoned by a failed render");
                self.inner.clear_poison();
                return Err(MapError::ResourceFault(
                    "dataset lock poisoned by an earlier failed render".to_string(),
                ));
            }
        };
        histogram!("map_gate_wait_seconds").record(waiting.elapsed().as_secs_f64());

        let held = Instant::now();
        let result = f(&mut **guard);
        histogram!("map_gate_hold_seconds").record(held.elapsed().as_secs_f64());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_value_flows_through() {
        let gate: DatasetGate<Vec<u32>> = DatasetGate::new(Box::new(vec![1, 2]));
        gate.with_exclusive(|v| {
            v.push(3);
            Ok(())
        })
        .unwrap();
        assert_eq!(gate.with_exclusive(|v| Ok(v.len())).unwrap(), 3);
    }

    #[test]
    fn test_error_releases_gate() {
        let gate: DatasetGate<u32> = DatasetGate::new(Box::new(0));
        let err = gate
            .with_exclusive(|_| -> MapResult<()> { Err(MapError::UnknownField("x".into())) })
            .unwrap_err();
        assert!(matches!(err, MapError::UnknownField(_)));
        assert_eq!(gate.with_exclusive(|v| Ok(*v)).unwrap(), 0);
    }

    #[test]
    fn test_poisoned_gate_recovers() {
        let gate: Arc<DatasetGate<u32>> = Arc::new(DatasetGate::new(Box::new(7)));
        let g = gate.clone();
        let joined = std::thread::spawn(move || {
            g.with_exclusive(|_| -> MapResult<()> { panic!("render blew up") })
        })
        .join();
        assert!(joined.is_err());

        let err = gate.with_exclusive(|v| Ok(*v)).unwrap_err();
        assert!(matches!(err, MapError::ResourceFault(_)));
        assert_eq!(gate.with_exclusive(|v| Ok(*v)).unwrap(), 7);
    }
}
