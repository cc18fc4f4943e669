// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod diff;
pub mod input;
pub mod logging;
pub mod prober;
pub mod report;
pub mod results;
pub mod tester;
pub mod variants;
