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
use serde::{Serialize,Deserialize};
use tracing::{debug,warn};

use crate::errors::{invalid_batch, Result};

/// two points closer than this (in degrees) are considered to be at the same location
pub const LON_LAT_EPSILON: f64 = 1e-7;
/// .. and this in meters for altitude
pub const ALT_EPSILON: f64 = 0.01;

pub const DEFAULT_TRACK_COLOR: &str = "#ff8000";

#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq)]
pub struct TrackPoint {
    pub longitude: f64, // degrees
    pub latitude: f64,  // degrees
    pub altitude: f64,  // meters
}

impl TrackPoint {
    pub fn new (longitude: f64, latitude: f64, altitude: f64)->Self {
        TrackPoint { longitude, latitude, altitude }
    }

    pub fn is_same_location (&self, other: &TrackPoint)->bool {
        (self.longitude - other.longitude).abs() < LON_LAT_EPSILON &&
        (self.latitude - other.latitude).abs() < LON_LAT_EPSILON &&
        (self.altitude - other.altitude).abs() < ALT_EPSILON
    }
}

impl fmt::Display for TrackPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "({:.6},{:.6},{:.1})", self.longitude, self.latitude, self.altitude)
    }
}

/// a path of an entity. Live tracks have a parallel `times` array (epoch seconds), static tracks don't.
/// If present, `times` and `ground_height_profile` have the same length as `points` and `times` is strictly increasing.
/// Live tracks only get modified through [`merge_batch`] and [`remove_duplicate_points`]
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LiveTrack {
    pub id: String,
    pub points: Vec<TrackPoint>,
    pub times: Option<Vec<f64>>,
    pub ground_height_profile: Option<Vec<f64>>,
    pub color: String,
    pub is_flight_track: bool,

    /// the latest time any batch reported for this track. This can be later than the last time sample
    /// if the entity did not move and duplicates were removed
    pub reported_until: Option<f64>,
}

impl LiveTrack {
    /// an empty live track
    pub fn new (id: impl ToString, color: impl ToString, is_flight_track: bool)->Self {
        LiveTrack {
            id: id.to_string(),
            points: Vec::new(),
            times: Some( Vec::new()),
            ground_height_profile: None,
            color: color.to_string(),
            is_flight_track,
            reported_until: None
        }
    }

    /// a track without time information that can't be played back or merged
    pub fn new_static (id: impl ToString, points: Vec<TrackPoint>, color: impl ToString, is_flight_track: bool)->Self {
        LiveTrack {
            id: id.to_string(),
            points,
            times: None,
            ground_height_profile: None,
            color: color.to_string(),
            is_flight_track,
            reported_until: None
        }
    }

    pub fn is_live (&self)->bool { self.times.is_some() }

    pub fn len (&self)->usize { self.points.len() }

    pub fn is_empty (&self)->bool { self.points.is_empty() }

    pub fn first_time (&self)->Option<f64> { self.times.as_ref().and_then( |t| t.first().copied()) }

    pub fn last_time (&self)->Option<f64> { self.times.as_ref().and_then( |t| t.last().copied()) }

    /// the time up to which we have position information
    pub fn last_reported_time (&self)->Option<f64> {
        match (self.reported_until, self.last_time()) {
            (Some(r), Some(t)) => Some( r.max(t)),
            (r, t) => r.or(t)
        }
    }

    pub fn is_consistent (&self)->bool {
        let n = self.points.len();
        if let Some(times) = &self.times {
            if times.len() != n || !is_strictly_increasing( times) { return false }
        }
        if let Some(profile) = &self.ground_height_profile {
            if profile.len() != n { return false }
        }
        true
    }
}

/// a set of new positions for a live track as received from the server
#[derive(Debug,Clone,PartialEq)]
pub struct TrackBatch {
    pub points: Vec<TrackPoint>,
    pub times: Vec<f64>,
    pub ground_height_profile: Option<Vec<f64>>,
}

impl TrackBatch {
    /// create a batch from a flat `[lon,lat,alt, ..]` coordinate array
    pub fn from_flat (flat: &[f64], times: Vec<f64>, ground_height_profile: Option<Vec<f64>>)->Result<Self> {
        if flat.len() % 3 != 0 {
            return Err( invalid_batch!("flat point array length {} is not a multiple of 3", flat.len()))
        }
        let points = flat.chunks_exact(3).map( |c| TrackPoint::new( c[0], c[1], c[2])).collect();
        Ok( TrackBatch { points, times, ground_height_profile } )
    }

    pub fn len (&self)->usize { self.points.len() }

    pub fn is_empty (&self)->bool { self.points.is_empty() }

    /// the reason why this batch can't be merged, or None if it is well formed
    pub fn check (&self)->Option<String> {
        let n = self.points.len();
        if n == 0 {
            Some( "empty batch".to_string())
        } else if self.times.len() != n {
            Some( format!("{} points but {} times", n, self.times.len()))
        } else if self.ground_height_profile.as_ref().map( |p| p.len() != n).unwrap_or(false) {
            Some( format!("{} points but ground height profile of length {}", n, self.ground_height_profile.as_ref().map( |p| p.len()).unwrap_or(0)))
        } else if self.times.iter().any( |t| !t.is_finite()) {
            Some( "non-finite time value".to_string())
        } else if !is_strictly_increasing( &self.times) {
            Some( "times not strictly increasing".to_string())
        } else {
            None
        }
    }
}

/// the ingestion message for live track updates
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LiveTrackMessage {
    pub id: String,
    pub track_points_flat: Vec<f64>,
    pub time_points_epoch_seconds: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_height_profile: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl LiveTrackMessage {
    pub fn to_batch (&self)->Result<TrackBatch> {
        TrackBatch::from_flat( &self.track_points_flat, self.time_points_epoch_seconds.clone(), self.ground_height_profile.clone())
    }
}

#[derive(Debug,Clone,PartialEq)]
pub enum MergeOutcome {
    /// the track was not changed
    Rejected(String),
    /// `discarded` existing samples were replaced by the batch, `appended` samples were added
    Merged { discarded: usize, appended: usize },
}

impl MergeOutcome {
    pub fn is_merged (&self)->bool { matches!( self, MergeOutcome::Merged{..}) }
}

/// merge a new batch into a live track.
///
/// The batch is authoritative from its first time on: all existing samples at or after `batch.times[0]` are
/// discarded (this includes the sample that exactly matches the batch start, which is how providers send corrections),
/// then the batch is appended. Malformed batches are rejected without modifying the track
pub fn merge_batch (track: &mut LiveTrack, batch: &TrackBatch)->MergeOutcome {
    if let Some(reason) = batch.check() {
        warn!("rejected batch for track {}: {}", track.id, reason);
        return MergeOutcome::Rejected(reason)
    }

    if track.times.is_none() {
        if track.points.is_empty() {
            track.times = Some( Vec::new());
        } else {
            warn!("rejected batch for track {}: not a live track", track.id);
            return MergeOutcome::Rejected( "not a live track".to_string())
        }
    }

    let t0 = batch.times[0];
    let n_existing = track.points.len();
    let k = track.times.as_ref().and_then( |times| times.iter().position( |t| *t >= t0)).unwrap_or( n_existing);
    let discarded = n_existing - k;

    track.points.truncate( k);
    if let Some(times) = &mut track.times { times.truncate( k); }
    if let Some(profile) = &mut track.ground_height_profile { profile.truncate( k); }

    track.ground_height_profile = match (track.ground_height_profile.take(), &batch.ground_height_profile) {
        (Some(mut profile), Some(batch_profile)) => {
            profile.extend_from_slice( batch_profile);
            Some(profile)
        }
        (_, Some(batch_profile)) if k == 0 => Some( batch_profile.clone()),
        (Some(_), None) | (None, Some(_)) => {
            debug!("dropping ground height profile of track {} (only partially available)", track.id);
            None
        }
        (None, None) => None
    };

    track.points.extend_from_slice( &batch.points);
    if let Some(times) = &mut track.times { times.extend_from_slice( &batch.times); }

    let t_last = batch.times[batch.times.len()-1];
    track.reported_until = Some( track.reported_until.map( |r| r.max( t_last)).unwrap_or( t_last));

    if discarded > 0 && discarded == n_existing {
        warn!("track {}: batch starting at t={} replaced all {} existing samples", track.id, t0, discarded);
    } else if discarded > 0 {
        debug!("track {}: replaced {} samples from t={}", track.id, discarded, t0);
    }

    MergeOutcome::Merged { discarded, appended: batch.points.len() }
}

/// collapse runs of consecutive points at the same location (within epsilon) into the first point of the run,
/// removing the same indices from times and ground height profile. Returns the number of removed points
pub fn remove_duplicate_points (track: &mut LiveTrack)->usize {
    let n = track.points.len();
    if n < 2 { return 0 }

    let mut keep = vec![true; n];
    let mut last_kept = 0;
    for i in 1..n {
        if track.points[i].is_same_location( &track.points[last_kept]) {
            keep[i] = false;
        } else {
            last_kept = i;
        }
    }

    let n_removed = keep.iter().filter( |k| !**k).count();
    if n_removed > 0 {
        retain_by_mask( &mut track.points, &keep);
        if let Some(times) = &mut track.times { retain_by_mask( times, &keep); }
        if let Some(profile) = &mut track.ground_height_profile { retain_by_mask( profile, &keep); }
    }
    n_removed
}

fn retain_by_mask<T> (v: &mut Vec<T>, keep: &[bool]) {
    let mut i = 0;
    v.retain( |_| {
        let k = keep.get(i).copied().unwrap_or(true);
        i += 1;
        k
    });
}

fn is_strictly_increasing (times: &[f64])->bool {
    times.windows(2).all( |w| w[0] < w[1])
}
