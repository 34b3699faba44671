/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */
#![allow(unused)]

use std::{sync::atomic::{AtomicI64,Ordering}, time::Duration};
use chrono::{DateTime,TimeDelta,Utc};

/// the time source for polling decisions and synthesized positions.
/// Everything that has to decide based on "now" gets a clock injected so that tests can run on simulated time
pub trait Clock: Send + Sync {
    fn now (&self)->DateTime<Utc>;
}

/// wall clock
#[derive(Debug,Default,Clone,Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now (&self)->DateTime<Utc> { Utc::now() }
}

/// a clock that only moves when told so
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicI64
}

impl ManualClock {
    pub fn new (start: DateTime<Utc>)->Self {
        ManualClock { millis: AtomicI64::new( start.timestamp_millis()) }
    }

    pub fn from_epoch_secs (secs: i64)->Self {
        ManualClock { millis: AtomicI64::new( secs * 1000) }
    }

    pub fn set (&self, date: DateTime<Utc>) {
        self.millis.store( date.timestamp_millis(), Ordering::SeqCst);
    }

    pub fn set_epoch_secs (&self, secs: i64) {
        self.millis.store( secs * 1000, Ordering::SeqCst);
    }

    pub fn advance (&self, dur: Duration) {
        self.millis.fetch_add( dur.as_millis() as i64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now (&self)->DateTime<Utc> {
        DateTime::from_timestamp_millis( self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }
}

/// std Durations from configs are unsigned and can't overflow a TimeDelta for any sane value
pub fn time_delta (dur: Duration)->TimeDelta {
    TimeDelta::from_std( dur).unwrap_or( TimeDelta::MAX)
}
