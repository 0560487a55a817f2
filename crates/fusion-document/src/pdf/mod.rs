// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — the lopdf document model and page copying.

mod copier;
pub mod model;

pub use model::{LopdfDocument, LopdfDonor, LopdfModel, LopdfRaster};
