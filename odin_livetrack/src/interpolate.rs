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

/// linear. Higher degrees overshoot on the sparse and irregular samples we get from satellite messengers
pub const DEFAULT_DEGREE: usize = 1;

/// Lagrange polynomial interpolation of `vs` over strictly increasing sample times `ts` at time `t`.
/// The polynomial goes through the `degree+1` samples around the segment containing `t` (fewer if we don't have that many).
/// Returns None if there are no samples or `t` is outside of `[ts[0], ts[n-1]]`
pub fn lagrange_interpolate (ts: &[f64], vs: &[f64], t: f64, degree: usize)->Option<f64> {
    let n = ts.len().min( vs.len());
    lagrange_interpolate_by( &ts[..n], t, degree, |i| vs[i])
}

/// same as [`lagrange_interpolate`] but sample values are obtained through `value(i)`, which is only called
/// for indices within the interpolation window
pub fn lagrange_interpolate_by<F> (ts: &[f64], t: f64, degree: usize, value: F)->Option<f64> where F: Fn(usize)->f64 {
    let n = ts.len();
    if n == 0 || !t.is_finite() || t < ts[0] || t > ts[n-1] { return None }
    if n == 1 { return Some(value(0)) }

    let j = ts.partition_point( |x| *x <= t); // 1..=n
    let i = (j - 1).min( n - 2); // segment [i,i+1]
    if ts[i] == t { return Some(value(i)) }

    let m = (degree + 1).clamp( 2, n);
    let start = (i + 1).saturating_sub( m/2).min( n - m);

    let mut sum = 0.0;
    for a in start..start+m {
        let ta = ts[a];
        let mut w = 1.0;
        for b in start..start+m {
            if a != b {
                let tb = ts[b];
                w *= (t - tb) / (ta - tb);
            }
        }
        sum += value(a) * w;
    }
    Some(sum)
}
