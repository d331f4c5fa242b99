// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Doris-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Doris and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The export boundary.
//!
//! The explorer hands a finished [`CsvTable`] to a [`TableSink`] and is done;
//! quoting, encoding, and delivery (file, download, clipboard) are entirely
//! the sink's business. The demo binary ships a plain-text stdout sink; a
//! host application brings its own.

use std::io;

use crate::query::table::CsvTable;

/// Consumes flattened tables. Implementations own the actual text encoding
/// and wherever the bytes end up.
pub trait TableSink: Send {
    fn deliver(&mut self, table: &CsvTable) -> io::Result<()>;
}

impl<S: TableSink + ?Sized> TableSink for Box<S> {
    fn deliver(&mut self, table: &CsvTable) -> io::Result<()> {
        (**self).deliver(table)
    }
}
