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

use std::fmt;
use chrono::{DateTime,SecondsFormat,TimeDelta,Utc};
use serde::{Serialize,Deserialize};
use tracing::warn;

use crate::{interpolate::lagrange_interpolate_by, track::{LiveTrack,TrackPoint}};

pub const MIN_OFFSET_SECS: f64 = -900.0;
pub const MAX_OFFSET_SECS: f64 = 0.0;
pub const DEFAULT_OFFSET_SECS: f64 = -180.0;

/// the clock we use to play back live tracks. It runs `offset_seconds` behind real time so that positions
/// which arrive late (provider lag) can still be shown without jumps
#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackClock {
    offset_seconds: f64, // in [MIN_OFFSET_SECS,MAX_OFFSET_SECS]
}

impl Default for PlaybackClock {
    fn default()->Self {
        PlaybackClock { offset_seconds: DEFAULT_OFFSET_SECS }
    }
}

impl PlaybackClock {
    pub fn new ()->Self { Self::default() }

    pub fn offset_seconds (&self)->f64 { self.offset_seconds }

    /// set the playback offset, clamped to the supported range. Returns the offset that is in effect
    pub fn set_offset (&mut self, secs: f64)->f64 {
        if secs.is_nan() {
            warn!("ignoring NaN playback offset");
        } else {
            let clamped = secs.clamp( MIN_OFFSET_SECS, MAX_OFFSET_SECS);
            if clamped != secs {
                warn!("playback offset {} out of range, using {}", secs, clamped);
            }
            self.offset_seconds = clamped;
        }
        self.offset_seconds
    }

    pub fn reset (&mut self) {
        self.offset_seconds = DEFAULT_OFFSET_SECS;
    }

    /// the time (epoch seconds) we display for the given wall clock time
    pub fn display_time (&self, now_secs: f64)->f64 {
        now_secs + self.offset_seconds
    }

    pub fn display_date (&self, now: DateTime<Utc>)->DateTime<Utc> {
        now + TimeDelta::milliseconds( (self.offset_seconds * 1000.0).round() as i64)
    }
}

/// the interpolated position of a live track at time `t` (epoch seconds).
/// None for static tracks and times before the first sample, the last sample for times after the end
pub fn position_at (track: &LiveTrack, t: f64, degree: usize)->Option<TrackPoint> {
    let times = track.times.as_ref()?;
    let n = times.len().min( track.points.len());
    if n == 0 || !t.is_finite() || t < times[0] { return None }
    if t >= times[n-1] { return Some( track.points[n-1]) }

    let times = &times[..n];
    let points = &track.points;

    Some( TrackPoint {
        longitude: lagrange_interpolate_by( times, t, degree, |i| points[i].longitude)?,
        latitude: lagrange_interpolate_by( times, t, degree, |i| points[i].latitude)?,
        altitude: lagrange_interpolate_by( times, t, degree, |i| points[i].altitude)?,
    })
}

#[derive(Serialize,Debug,Clone,Copy,PartialEq)]
pub enum TrackFreshness {
    /// static track or no samples yet
    NoData,
    /// display time is not past the last reported time
    Fresh,
    /// display time is past the last reported time (epoch seconds)
    Stale { since: f64 },
}

impl TrackFreshness {
    pub fn of (track: &LiveTrack, display_time: f64)->Self {
        if !track.is_live() { return TrackFreshness::NoData }
        match track.last_reported_time() {
            None => TrackFreshness::NoData,
            Some(last) if display_time > last => TrackFreshness::Stale { since: last },
            Some(_) => TrackFreshness::Fresh
        }
    }

    pub fn is_stale (&self)->bool { matches!( self, TrackFreshness::Stale{..}) }

    pub fn label (&self)->String {
        match self {
            TrackFreshness::NoData => "no data".to_string(),
            TrackFreshness::Fresh => "fresh".to_string(),
            TrackFreshness::Stale { since } => format!("stale, since {}", format_epoch_secs( *since))
        }
    }
}

impl fmt::Display for TrackFreshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str( &self.label())
    }
}

pub fn format_epoch_secs (secs: f64)->String {
    match DateTime::<Utc>::from_timestamp_millis( (secs * 1000.0).round() as i64) {
        Some(date) => date.to_rfc3339_opts( SecondsFormat::Secs, true),
        None => format!("{secs}")
    }
}
