// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

pub mod actions;
pub mod logging;
pub mod redirect;

pub use actions::ActionsConfigLayer;
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use redirect::{RedirectConfig, RedirectConfigLayer, MIN_SECRET_LEN};
