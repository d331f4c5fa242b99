// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Doris-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Doris and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

/// Raw new-node form input, exactly as a dashboard form would hold it.
///
/// `employees` is `None` while the numeric field is blank; negative input is
/// representable so validation (not the type system) can report it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewNodeForm {
    pub label: String,
    pub description: String,
    pub employees: Option<i64>,
}

impl NewNodeForm {
    pub fn new(
        label: impl Into<String>,
        description: impl Into<String>,
        employees: Option<i64>,
    ) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
            employees,
        }
    }

    /// Checks every field and reports *all* violations at once, so a form can
    /// mark each offending input in a single pass instead of revealing errors
    /// one submit at a time.
    pub fn validate(&self) -> Result<ValidNewNode, Vec<FieldIssue>> {
        let mut issues = Vec::new();

        let label = self.label.trim();
        if label.is_empty() {
            issues.push(FieldIssue::EmptyLabel);
        }

        let description = self.description.trim();
        if description.is_empty() {
            issues.push(FieldIssue::EmptyDescription);
        }

        let employees = match self.employees {
            Some(count) if count >= 0 => u32::try_from(count).ok(),
            _ => None,
        };
        if employees.is_none() {
            issues.push(FieldIssue::InvalidEmployeeCount);
        }

        if !issues.is_empty() {
            return Err(issues);
        }

        Ok(ValidNewNode {
            label: label.to_owned(),
            description: description.to_owned(),
            employees: employees.unwrap_or(0),
        })
    }

    /// Resets all inputs. Callers invoke this only after a successful submit,
    /// never on a validation or server failure.
    pub fn clear(&mut self) {
        self.label.clear();
        self.description.clear();
        self.employees = None;
    }
}

/// Form data that passed validation: trimmed strings, non-negative count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidNewNode {
    pub label: String,
    pub description: String,
    pub employees: u32,
}

/// One violated form field. `Display` yields the stable issue code a form
/// binds its error badges to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldIssue {
    EmptyLabel,
    EmptyDescription,
    InvalidEmployeeCount,
}

impl FieldIssue {
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyLabel => "empty_node_label",
            Self::EmptyDescription => "empty_description",
            Self::InvalidEmployeeCount => "invalid_employee_count",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::EmptyLabel => "label must not be empty",
            Self::EmptyDescription => "description must not be empty",
            Self::InvalidEmployeeCount => "employee count must be a non-negative number",
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
