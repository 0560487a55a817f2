// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// fusion-session — file intake, ordering, previews, and output delivery
// around the document composer.

pub mod intake;
pub mod ordering;
pub mod output;
pub mod preview;
pub mod session;

pub use intake::IncomingFile;
pub use ordering::OrderedSources;
pub use output::{DirectorySink, OutputSink, output_file_name};
pub use preview::{InMemoryPreviews, PreviewRegistry};
pub use session::{MergeSession, MergeStage, MergedFile};

use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber filtered by `RUST_LOG` (default `info`).
///
/// Safe to call more than once; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}
