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

use std::sync::Arc;
use chrono::{DateTime,Timelike,Utc,SecondsFormat};
use async_trait::async_trait;

use crate::{
    clock::{time_delta, Clock}, errors::Result,
    polling::PollingState, waypoint_id::{LiveWaypointId,ProviderType},
    LiveWaypointRecord, TestPosConfig
};
use super::{check_provider_type, LiveWaypointProvider};

const METERS_PER_DEGREE: f64 = 111_320.0;

/// synthetic live waypoints that walk a circle around a configured center, one degree of bearing per minute
/// of the day. Requires no network and is always eligible for a new request
pub struct TestPosProvider {
    config: TestPosConfig,
    clock: Arc<dyn Clock>,
    polling_state: PollingState,
}

impl TestPosProvider {
    pub fn new (config: TestPosConfig, clock: Arc<dyn Clock>)->Self {
        let polling_state = PollingState::new( config.nominal_interval);
        TestPosProvider { config, clock, polling_state }
    }

    /// the (lon,lat) position for a given time
    pub fn position_at (&self, date: DateTime<Utc>)->(f64,f64) {
        test_position( &self.config, date)
    }
}

#[async_trait]
impl LiveWaypointProvider for TestPosProvider {
    fn provider_type (&self)->ProviderType { ProviderType::TestPos }

    fn polling_state (&self)->&PollingState { &self.polling_state }

    /// nominal: this is what we tell clients, not what we enforce
    fn next_request_date (&self, id: &LiveWaypointId, now: DateTime<Utc>)->DateTime<Utc> {
        let last = self.polling_state.last_request( &id.to_string()).unwrap_or( now);
        last + time_delta( self.config.nominal_interval)
    }

    fn can_request (&self, id: &LiveWaypointId, now: DateTime<Utc>)->bool { true }

    async fn fetch (&self, id: &LiveWaypointId)->Result<LiveWaypointRecord> {
        check_provider_type( id, ProviderType::TestPos)?;

        let now = self.clock.now();
        let (longitude,latitude) = test_position( &self.config, now);
        self.polling_state.record_request( &id.to_string(), now);

        Ok( LiveWaypointRecord {
            id: id.clone(),
            name: "Test position".to_string(),
            description: format!("Test position '{}' at {}", id.payload(), now.to_rfc3339_opts( SecondsFormat::Secs, true)),
            details_link: String::new(),
            latitude,
            longitude,
            altitude: self.config.altitude,
            timestamp: now
        })
    }
}

fn test_position (config: &TestPosConfig, date: DateTime<Utc>)->(f64,f64) {
    let minute_of_day = date.num_seconds_from_midnight() as f64 / 60.0;
    let bearing = (minute_of_day % 360.0).to_radians();

    // bearing is clockwise from north
    let d_lat = config.radius * bearing.cos() / METERS_PER_DEGREE;
    let d_lon = config.radius * bearing.sin() / (METERS_PER_DEGREE * config.latitude.to_radians().cos());

    (config.longitude + d_lon, config.latitude + d_lat)
}
