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

use std::collections::HashMap;
use serde::Serialize;
use tracing::debug;

use crate::{
    errors::{OdinLiveTrackError, Result},
    interpolate::DEFAULT_DEGREE,
    playback::{position_at, PlaybackClock, TrackFreshness},
    track::{merge_batch, remove_duplicate_points, LiveTrack, LiveTrackMessage, MergeOutcome, TrackPoint, DEFAULT_TRACK_COLOR}
};

#[derive(Serialize,Debug,Clone,Copy,PartialEq,Eq)]
pub enum RenderMode {
    /// only re-render if something changed
    OnDemand,
    /// re-render every frame since positions move with the playback clock
    Continuous,
}

#[derive(Serialize,Debug,Clone,PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderedEntity {
    pub id: String,
    pub color: String,
    pub position: Option<TrackPoint>,
    pub freshness: TrackFreshness,
}

/// the live tracks of one view. Merges for a given id are applied in the order in which `ingest` is called,
/// which has to be the order in which the batches arrived
#[derive(Debug)]
pub struct LiveTrackStore {
    tracks: HashMap<String,LiveTrack>,
    degree: usize, // of interpolation polynomials
}

impl Default for LiveTrackStore {
    fn default()->Self { LiveTrackStore::new() }
}

impl LiveTrackStore {
    pub fn new ()->Self {
        LiveTrackStore { tracks: HashMap::new(), degree: DEFAULT_DEGREE }
    }

    pub fn with_degree (degree: usize)->Self {
        LiveTrackStore { tracks: HashMap::new(), degree }
    }

    pub fn degree (&self)->usize { self.degree }

    pub fn add_track (&mut self, track: LiveTrack)->Option<LiveTrack> {
        self.tracks.insert( track.id.clone(), track)
    }

    pub fn remove_track (&mut self, id: &str)->Option<LiveTrack> {
        self.tracks.remove( id)
    }

    pub fn get (&self, id: &str)->Option<&LiveTrack> { self.tracks.get( id) }

    pub fn len (&self)->usize { self.tracks.len() }

    pub fn is_empty (&self)->bool { self.tracks.is_empty() }

    pub fn tracks (&self)->impl Iterator<Item=&LiveTrack> { self.tracks.values() }

    /// merge a received message into its track (creating the track if we don't have it yet) and remove
    /// duplicate points. Only structurally invalid messages are errors, inconsistent batches are rejected outcomes
    pub fn ingest (&mut self, msg: &LiveTrackMessage)->Result<MergeOutcome> {
        let batch = msg.to_batch()?;

        let track = self.tracks.entry( msg.id.clone()).or_insert_with( || {
            LiveTrack::new( &msg.id, msg.color.as_deref().unwrap_or( DEFAULT_TRACK_COLOR), true)
        });
        if let Some(color) = &msg.color {
            track.color = color.clone();
        }

        let outcome = merge_batch( track, &batch);
        if outcome.is_merged() {
            let n_removed = remove_duplicate_points( track);
            if n_removed > 0 {
                debug!("removed {} duplicate points from track {}", n_removed, track.id);
            }
        }
        Ok(outcome)
    }

    pub fn has_live_tracks (&self)->bool {
        self.tracks.values().any( |t| t.is_live() && !t.is_empty())
    }

    pub fn render_mode (&self)->RenderMode {
        if self.has_live_tracks() { RenderMode::Continuous } else { RenderMode::OnDemand }
    }

    /// what to show at wall clock time `now_secs` (epoch seconds). Sorted by id
    pub fn render_frame (&self, clock: &PlaybackClock, now_secs: f64)->Vec<RenderedEntity> {
        let t = clock.display_time( now_secs);

        let mut entities: Vec<RenderedEntity> = self.tracks.values()
            .filter( |track| track.is_live())
            .map( |track| RenderedEntity {
                id: track.id.clone(),
                color: track.color.clone(),
                position: position_at( track, t, self.degree),
                freshness: TrackFreshness::of( track, t)
            })
            .collect();

        entities.sort_by( |a,b| a.id.cmp( &b.id));
        entities
    }

    pub fn stale_label (&self, id: &str, clock: &PlaybackClock, now_secs: f64)->Result<String> {
        let track = self.tracks.get( id).ok_or_else( || OdinLiveTrackError::UnknownTrack( id.to_string()))?;
        Ok( TrackFreshness::of( track, clock.display_time( now_secs)).label())
    }
}
