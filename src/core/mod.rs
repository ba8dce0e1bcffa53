/*
 * SPDX-License-Identifier: Apache-2.0 OR MIT
 */

pub mod header;
pub mod part;
pub mod reader;
