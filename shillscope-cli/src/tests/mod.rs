//! Shared test harness modules for the Shillscope CLI.

use super::*;

mod helpers;
