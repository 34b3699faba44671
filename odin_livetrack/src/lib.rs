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

/// client side processing of live tracks: successive position batches for an entity (e.g. a pilot) are merged
/// into one continuous path, near-duplicate points are removed, and the path is played back on a clock that runs
/// a configurable offset behind real time so that provider lag does not show up as jumps

pub mod errors;
pub use errors::{OdinLiveTrackError,Result};

pub mod track;
pub use track::*;

pub mod interpolate;
pub use interpolate::{lagrange_interpolate, lagrange_interpolate_by, DEFAULT_DEGREE};

pub mod playback;
pub use playback::*;

pub mod store;
pub use store::*;
