//! Scripted capability fakes shared by the unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use hopper_core::{Classification, HopperError, Result};

use crate::capability::{Classifier, Motor};

/// A motor that records successful drive commands and can be told to fail.
pub(crate) struct FakeMotor {
    power_calls: Mutex<Vec<f64>>,
    stop_calls: AtomicUsize,
    fail_set_power: AtomicBool,
    fail_stop: AtomicBool,
}

impl FakeMotor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            power_calls: Mutex::new(Vec::new()),
            stop_calls: AtomicUsize::new(0),
            fail_set_power: AtomicBool::new(false),
            fail_stop: AtomicBool::new(false),
        })
    }

    pub fn fail_set_power(&self) {
        self.fail_set_power.store(true, Ordering::SeqCst);
    }

    pub fn fail_stop(&self) {
        self.fail_stop.store(true, Ordering::SeqCst);
    }

    /// Power fractions from successful `set_power` calls, in order.
    pub fn power_calls(&self) -> Vec<f64> {
        self.power_calls.lock().unwrap().clone()
    }

    /// Number of `stop` calls attempted, including failed ones.
    pub fn stop_count(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Motor for FakeMotor {
    async fn set_power(&self, power: f64) -> Result<()> {
        if self.fail_set_power.load(Ordering::SeqCst) {
            return Err(HopperError::Motor("set power failed".to_string()));
        }
        self.power_calls.lock().unwrap().push(power);
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_stop.load(Ordering::SeqCst) {
            return Err(HopperError::Motor("stop failed".to_string()));
        }
        Ok(())
    }
}

/// A classifier that returns a scripted result set and counts queries.
pub(crate) struct FakeClassifier {
    results: Mutex<Vec<Classification>>,
    fail: AtomicBool,
    calls: AtomicUsize,
    last_query: Mutex<Option<(String, usize)>>,
}

impl FakeClassifier {
    pub fn returning(results: Vec<Classification>) -> Arc<Self> {
        Arc::new(Self {
            results: Mutex::new(results),
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        })
    }

    pub fn failing() -> Arc<Self> {
        let fake = Self::returning(Vec::new());
        fake.fail.store(true, Ordering::SeqCst);
        fake
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The `(source, max_results)` pair from the most recent query.
    pub fn last_query(&self) -> Option<(String, usize)> {
        self.last_query.lock().unwrap().clone()
    }
}

#[async_trait]
impl Classifier for FakeClassifier {
    async fn classify_from_source(
        &self,
        source: &str,
        max_results: usize,
    ) -> Result<Vec<Classification>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some((source.to_string(), max_results));

        if self.fail.load(Ordering::SeqCst) {
            return Err(HopperError::Classifier(
                "classifier unavailable".to_string(),
            ));
        }
        Ok(self.results.lock().unwrap().clone())
    }
}
