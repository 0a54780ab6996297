// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::fmt::Display;
use tracing::error;

/// Log a condition that can only be reached through a programming or deployment defect.
///
/// The operation is still aborted through its normal error path; this only makes sure the
/// defect stands out in the logs instead of looking like a routine rejection.
pub fn report_defect(context: &str, err: impl Display) {
    error!(
        "\n\nDEFECT: {context}.\n\nThe error supplied was: {err}\n\nThe operation has been aborted and rolled back.\n"
    );
}
