// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — connects the desktop binary to the docscan crates.

pub mod autopilot;
pub mod data_dir;
pub mod desktop_bridge;
