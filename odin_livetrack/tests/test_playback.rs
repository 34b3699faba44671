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

use std::cell::Cell;
use chrono::{DateTime,TimeZone,Utc};
use odin_livetrack::{
    format_epoch_secs, lagrange_interpolate, lagrange_interpolate_by, merge_batch, position_at, LiveTrack, PlaybackClock, TrackBatch,
    TrackFreshness, TrackPoint, DEFAULT_OFFSET_SECS, MAX_OFFSET_SECS, MIN_OFFSET_SECS
};

const NOW: f64 = 1714557600.0; // 2024-05-01T10:00:00Z

fn track_with (times: &[f64], points: &[TrackPoint])->LiveTrack {
    let mut track = LiveTrack::new( "pilot", "#ff0000", true);
    merge_batch( &mut track, &TrackBatch { points: points.to_vec(), times: times.to_vec(), ground_height_profile: None });
    track
}

#[test]
fn test_offset () {
    let mut clock = PlaybackClock::new();
    assert_eq!( clock.offset_seconds(), DEFAULT_OFFSET_SECS);
    assert_eq!( clock.display_time( NOW), NOW - 180.0);

    assert_eq!( clock.set_offset( -60.0), -60.0);
    assert_eq!( clock.display_time( NOW), NOW - 60.0);

    assert_eq!( clock.set_offset( -2000.0), MIN_OFFSET_SECS);
    assert_eq!( clock.set_offset( 10.0), MAX_OFFSET_SECS);
    assert_eq!( clock.set_offset( f64::NAN), MAX_OFFSET_SECS); // ignored

    clock.reset();
    assert_eq!( clock.offset_seconds(), -180.0);

    let now = Utc.with_ymd_and_hms( 2024, 5, 1, 10, 0, 0).unwrap();
    assert_eq!( clock.display_date( now), Utc.with_ymd_and_hms( 2024, 5, 1, 9, 57, 0).unwrap());
}

#[test]
fn test_stale_label () {
    let mut clock = PlaybackClock::new();
    clock.set_offset( -180.0);
    let p = TrackPoint::new( 11.0, 47.0, 1000.0);

    let track = track_with( &[NOW - 400.0, NOW - 200.0], &[p, p]);
    let f = TrackFreshness::of( &track, clock.display_time( NOW));
    println!("{f}");
    assert_eq!( f, TrackFreshness::Stale { since: NOW - 200.0 });
    assert_eq!( f.label(), format!("stale, since {}", format_epoch_secs( NOW - 200.0)));
    assert_eq!( f.label(), "stale, since 2024-05-01T09:56:40Z");

    let track = track_with( &[NOW - 400.0, NOW - 100.0], &[p, p]);
    let f = TrackFreshness::of( &track, clock.display_time( NOW));
    assert_eq!( f.label(), "fresh");

    let empty = LiveTrack::new( "nobody", "#ff0000", true);
    assert_eq!( TrackFreshness::of( &empty, NOW), TrackFreshness::NoData);
}

#[test]
fn test_position_at () {
    let p0 = TrackPoint::new( 11.0, 47.0, 1000.0);
    let p1 = TrackPoint::new( 11.2, 47.1, 1200.0);
    let track = track_with( &[100.0, 200.0], &[p0, p1]);

    assert_eq!( position_at( &track, 99.0, 1), None);
    assert_eq!( position_at( &track, 100.0, 1), Some(p0));

    let p = position_at( &track, 150.0, 1).unwrap();
    println!("{p}");
    assert!( (p.longitude - 11.1).abs() < 1e-9);
    assert!( (p.latitude - 47.05).abs() < 1e-9);
    assert!( (p.altitude - 1100.0).abs() < 1e-9);

    // hold last sample beyond the end
    assert_eq!( position_at( &track, 200.0, 1), Some(p1));
    assert_eq!( position_at( &track, 10_000.0, 1), Some(p1));

    let static_track = LiveTrack::new_static( "route", vec![p0, p1], "#00ff00", false);
    assert_eq!( position_at( &static_track, 150.0, 1), None);
}

#[test]
fn test_lagrange () {
    let ts = [0.0, 1.0, 2.0, 3.0, 4.0];
    let vs: Vec<f64> = ts.iter().map( |t| t*t).collect();

    // degree 2 reproduces a quadratic
    for t in [0.5, 1.25, 2.5, 3.75] {
        let v = lagrange_interpolate( &ts, &vs, t, 2).unwrap();
        assert!( (v - t*t).abs() < 1e-9, "t={t}: {v}");
    }

    // degree 1 is piecewise linear
    assert!( (lagrange_interpolate( &ts, &vs, 2.5, 1).unwrap() - 6.5).abs() < 1e-9);

    // degree larger than we have samples for
    assert!( (lagrange_interpolate( &ts[..2], &vs[..2], 0.5, 5).unwrap() - 0.5).abs() < 1e-9);

    assert_eq!( lagrange_interpolate( &ts, &vs, 3.0, 2), Some(9.0));
    assert_eq!( lagrange_interpolate( &ts, &vs, 5.0, 1), None);
    assert_eq!( lagrange_interpolate( &[], &[], 0.0, 1), None);
}

#[test]
fn test_interpolation_window () {
    let ts: Vec<f64> = (0..100).map( |i| i as f64).collect();
    let lo = Cell::new( usize::MAX);
    let hi = Cell::new( 0);

    let v = lagrange_interpolate_by( &ts, 50.5, 1, |i| {
        lo.set( lo.get().min(i));
        hi.set( hi.get().max(i));
        i as f64 * 2.0
    }).unwrap();

    assert!( (v - 101.0).abs() < 1e-9);
    assert_eq!( (lo.get(), hi.get()), (50, 51)); // only the samples of the enclosing segment were read
}

#[test]
fn test_position_at_higher_degree () {
    let times: Vec<f64> = (0..6).map( |i| 100.0 + i as f64 * 10.0).collect();
    let points: Vec<TrackPoint> = times.iter().map( |t| {
        let dt = t - 100.0;
        TrackPoint::new( 11.0 + dt * 0.001, 47.0 + dt * dt * 1e-5, 1000.0 + dt * dt)
    }).collect();
    let track = track_with( &times, &points);

    let p = position_at( &track, 125.0, 2).unwrap();
    assert!( (p.longitude - 11.025).abs() < 1e-9);
    assert!( (p.latitude - (47.0 + 625.0 * 1e-5)).abs() < 1e-9); // quadratic is reproduced
    assert!( (p.altitude - 1625.0).abs() < 1e-6);
}
