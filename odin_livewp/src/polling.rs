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

use std::{collections::HashMap, sync::{Mutex,PoisonError}, time::Duration};
use chrono::{DateTime,Utc};
use crate::clock::time_delta;

/// per-id record of when we last successfully queried a provider.
/// Each provider instance owns one of these, which is the only thing that decides if a new upstream request is allowed
#[derive(Debug)]
pub struct PollingState {
    min_interval: Duration,
    last_requests: Mutex<HashMap<String,DateTime<Utc>>>,
}

impl PollingState {
    pub fn new (min_interval: Duration)->Self {
        PollingState { min_interval, last_requests: Mutex::new( HashMap::new()) }
    }

    pub fn min_interval (&self)->Duration { self.min_interval }

    pub fn last_request (&self, key: &str)->Option<DateTime<Utc>> {
        self.last_requests.lock().unwrap_or_else( PoisonError::into_inner).get( key).copied()
    }

    /// `last_request + min_interval`, or `now` if we never requested this key
    pub fn next_request_date (&self, key: &str, now: DateTime<Utc>)->DateTime<Utc> {
        match self.last_request( key) {
            Some(last) => last.checked_add_signed( time_delta( self.min_interval)).unwrap_or( DateTime::<Utc>::MAX_UTC),
            None => now
        }
    }

    pub fn record_request (&self, key: &str, date: DateTime<Utc>) {
        self.last_requests.lock().unwrap_or_else( PoisonError::into_inner).insert( key.to_string(), date);
    }

    /// drop all entries that were last requested before `cutoff`. Returns number of removed entries
    pub fn prune (&self, cutoff: DateTime<Utc>)->usize {
        let mut map = self.last_requests.lock().unwrap_or_else( PoisonError::into_inner);
        let n = map.len();
        map.retain( |_,last| *last >= cutoff);
        n - map.len()
    }

    pub fn len (&self)->usize {
        self.last_requests.lock().unwrap_or_else( PoisonError::into_inner).len()
    }
}
