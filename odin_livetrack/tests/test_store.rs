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

use std::fs;
use odin_livetrack::{
    errors::OdinLiveTrackError,
    LiveTrack, LiveTrackMessage, LiveTrackStore, MergeOutcome, PlaybackClock, RenderMode, TrackFreshness, TrackPoint
};

const JANE: &str = "livewp://GarminInreach/JanePilot";
const SPOT: &str = "livewp://FindMeSpot/abcdefgh12345678";

fn load_messages ()->Vec<LiveTrackMessage> {
    let contents = fs::read_to_string("resources/pilot_batches.json").unwrap();
    serde_json::from_str( &contents).unwrap()
}

#[test]
fn test_ingest () {
    let mut store = LiveTrackStore::new();
    assert_eq!( store.render_mode(), RenderMode::OnDemand);

    let outcomes: Vec<MergeOutcome> = load_messages().iter().map( |msg| store.ingest( msg).unwrap()).collect();
    for o in &outcomes { println!("{o:?}"); }

    assert_eq!( outcomes[0], MergeOutcome::Merged { discarded: 0, appended: 4 });
    assert_eq!( outcomes[1], MergeOutcome::Merged { discarded: 2, appended: 3 });
    assert_eq!( outcomes[2], MergeOutcome::Merged { discarded: 0, appended: 2 });
    assert!( !outcomes[4].is_merged()); // one point, two times

    assert_eq!( store.len(), 2);
    assert_eq!( store.render_mode(), RenderMode::Continuous);

    let jane = store.get( JANE).unwrap();
    println!("{jane:#?}");
    // the two points of the last batch don't move and are collapsed into the last point of the previous batch
    assert_eq!( jane.len(), 5);
    assert_eq!( jane.last_time(), Some( 1714557840.0));
    assert_eq!( jane.reported_until, Some( 1714557960.0));
    assert!( jane.ground_height_profile.is_none()); // last batch had none
    assert!( jane.is_consistent());
    assert_eq!( jane.color, "#ff8000");

    let spot = store.get( SPOT).unwrap();
    assert_eq!( spot.len(), 2);
    assert_eq!( spot.color, "#0080ff");
}

#[test]
fn test_render_frame () {
    let mut store = LiveTrackStore::new();
    for msg in load_messages() { store.ingest( &msg).unwrap(); }
    let clock = PlaybackClock::new(); // -180s

    // display time 1714557690: between JANE samples 1 and 2, between SPOT samples 0 and 1
    let now = 1714557690.0 + 180.0;
    let frame = store.render_frame( &clock, now);
    println!("{frame:#?}");

    assert_eq!( frame.len(), 2);
    assert_eq!( frame[0].id, SPOT); // sorted by id
    assert_eq!( frame[1].id, JANE);

    let p = frame[1].position.unwrap();
    assert!( (p.longitude - 11.80175).abs() < 1e-9); // halfway between the 660 sample and the corrected 720 sample
    assert!( (p.latitude - 47.65175).abs() < 1e-9);
    assert_eq!( frame[1].freshness, TrackFreshness::Fresh);

    // way past the end: last positions are held, both tracks are stale
    let later = 1714560000.0;
    let frame = store.render_frame( &clock, later);
    assert_eq!( frame[1].position, Some( TrackPoint::new( 11.804, 47.654, 1760.0)));
    assert_eq!( frame[1].freshness, TrackFreshness::Stale { since: 1714557960.0 });
    assert_eq!( store.stale_label( JANE, &clock, later).unwrap(), "stale, since 2024-05-01T10:06:00Z");
    assert_eq!( store.stale_label( SPOT, &clock, later).unwrap(), "stale, since 2024-05-01T10:02:30Z");

    // before the first sample there is nothing to show
    let frame = store.render_frame( &clock, 1714557000.0);
    assert!( frame.iter().all( |e| e.position.is_none()));
    match store.stale_label( "unknown", &clock, later) {
        Err(OdinLiveTrackError::UnknownTrack(id)) => assert_eq!( id, "unknown"),
        other => panic!("expected UnknownTrack, got {other:?}")
    }
}

#[test]
fn test_render_mode () {
    let mut store = LiveTrackStore::new();
    store.add_track( LiveTrack::new_static( "route", vec![TrackPoint::new( 11.0, 47.0, 0.0)], "#00ff00", false));
    assert_eq!( store.render_mode(), RenderMode::OnDemand);
    assert!( store.render_frame( &PlaybackClock::new(), 0.0).is_empty()); // static tracks are not played back

    let msg = LiveTrackMessage {
        id: "p1".to_string(),
        track_points_flat: vec![11.0, 47.0, 1000.0],
        time_points_epoch_seconds: vec![100.0],
        ground_height_profile: None,
        color: None
    };
    store.ingest( &msg).unwrap();
    assert_eq!( store.render_mode(), RenderMode::Continuous);

    store.remove_track( "p1");
    assert_eq!( store.render_mode(), RenderMode::OnDemand);
}

#[test]
fn test_ingest_invalid_message () {
    let mut store = LiveTrackStore::new();
    let msg = LiveTrackMessage {
        id: "p1".to_string(),
        track_points_flat: vec![11.0, 47.0],
        time_points_epoch_seconds: vec![100.0],
        ground_height_profile: None,
        color: None
    };
    assert!( store.ingest( &msg).is_err());
    assert!( store.get( "p1").is_none());
}
