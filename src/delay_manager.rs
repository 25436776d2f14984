use std::thread;
use std::time::Duration;

use log::info;
use rand::Rng;

/// Random pause between sequential targets. A zero range disables it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PolitenessDelay {
    pub min_secs: u64,
    pub max_secs: u64,
}

impl PolitenessDelay {
    pub fn new(min_secs: u64, max_secs: u64) -> Self {
        PolitenessDelay {
            min_secs: min_secs.min(max_secs),
            max_secs: min_secs.max(max_secs),
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.max_secs == 0
    }

    pub fn pick_secs(&self) -> u64 {
        let mut rng = rand::thread_rng();
        rng.gen_range(self.min_secs..=self.max_secs)
    }

    pub fn wait(&self) {
        if self.is_disabled() {
            return;
        }
        let delay_secs = self.pick_secs();
        info!("Waiting for {} seconds before next target...", delay_secs);
        thread::sleep(Duration::from_secs(delay_secs));
    }
}
