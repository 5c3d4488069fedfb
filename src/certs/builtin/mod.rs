// SPDX-License-Identifier: Apache-2.0

//! Interfaces for retrieving the public vendor CA certificates.

/// OPTIGA(TM) Trust X.
pub mod trust_x;

use super::*;
