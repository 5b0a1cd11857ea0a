//! # Navigation
//!
//! The dashboard's page table and the permission rules that decide what a
//! signed-in user may see.
//!
//! ## Visibility Rule
//! ```text
//! entry.permissions = []            → always visible
//! entry.permissions = [p1, p2, ...] → visible iff user holds p1 OR p2 OR ...
//! section with no visible entries   → omitted
//! ```
//!
//! The backend enforces permissions on every request; hiding an entry is
//! presentation only.

use std::collections::HashSet;

use serde::Serialize;

// =============================================================================
// Permission Set
// =============================================================================

/// Permission codes held by the current user (`inventory:create`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    codes: HashSet<String>,
}

impl PermissionSet {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PermissionSet {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    /// OR rule: an empty requirement allows everyone, otherwise any one
    /// held code is enough. Also used as the page guard.
    pub fn allows(&self, required: &[&str]) -> bool {
        required.is_empty() || required.iter().any(|code| self.has(code))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        PermissionSet::new(iter)
    }
}

// =============================================================================
// Navigation Table
// =============================================================================

/// One sidebar link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub name: &'static str,
    pub href: &'static str,
    pub permissions: &'static [&'static str],
}

impl NavEntry {
    const fn new(
        name: &'static str,
        href: &'static str,
        permissions: &'static [&'static str],
    ) -> Self {
        NavEntry {
            name,
            href,
            permissions,
        }
    }

    /// Whether this link is highlighted for `pathname`.
    ///
    /// Exact match, or a sub-path of the entry. The dashboard root only
    /// matches exactly so it does not light up on every page.
    pub fn is_active(&self, pathname: &str) -> bool {
        pathname == self.href
            || (self.href != DASHBOARD_HOME
                && pathname
                    .strip_prefix(self.href)
                    .is_some_and(|rest| rest.starts_with('/')))
    }
}

/// A titled group of links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavSection {
    pub title: &'static str,
    pub entries: Vec<NavEntry>,
}

pub const DASHBOARD_HOME: &str = "/dashboard";

const ORDERS_CREATE: &str = "orders:create";
const CUSTOMERS_CREATE: &str = "customers:create";
const INVENTORY_CREATE: &str = "inventory:create";
const USERS_CREATE: &str = "users:create";
const SETTINGS_READ: &str = "settings:read";
const SETTINGS_CREATE: &str = "settings:create";

const MAIN: &[NavEntry] = &[
    NavEntry::new("Dashboard", DASHBOARD_HOME, &[]),
    NavEntry::new("POS Terminal", "/dashboard/pos", &[ORDERS_CREATE]),
    NavEntry::new("Orders", "/dashboard/orders", &[ORDERS_CREATE]),
    NavEntry::new("Customers", "/dashboard/customers", &[CUSTOMERS_CREATE]),
];

const MANAGE: &[NavEntry] = &[
    NavEntry::new("Inventory", "/dashboard/inventory", &[INVENTORY_CREATE]),
    NavEntry::new("Manufacturers", "/dashboard/manufacturers", &[INVENTORY_CREATE]),
    NavEntry::new("Brands", "/dashboard/brands", &[INVENTORY_CREATE]),
    NavEntry::new("Units", "/dashboard/units", &[INVENTORY_CREATE]),
    NavEntry::new("Product Categories", "/dashboard/categories", &[INVENTORY_CREATE]),
    NavEntry::new("Products", "/dashboard/products", &[INVENTORY_CREATE]),
];

const OPERATIONS: &[NavEntry] = &[
    NavEntry::new("Staff Management", "/dashboard/users", &[USERS_CREATE]),
    NavEntry::new("Roles & Permissions", "/dashboard/roles", &[]),
    NavEntry::new("Audit History", "/dashboard/audit", &[SETTINGS_READ]),
];

const SETTINGS: &[NavEntry] = &[NavEntry::new(
    "Settings",
    "/dashboard/settings",
    &[SETTINGS_CREATE],
)];

const SECTIONS: &[(&str, &[NavEntry])] = &[
    ("Main", MAIN),
    ("Manage", MANAGE),
    ("Operations", OPERATIONS),
    ("Settings", SETTINGS),
];

/// Every entry, in sidebar order.
pub fn all_entries() -> impl Iterator<Item = &'static NavEntry> {
    SECTIONS.iter().flat_map(|&(_, entries)| entries.iter())
}

/// The sidebar as `permissions` sees it.
pub fn visible_sections(permissions: &PermissionSet) -> Vec<NavSection> {
    SECTIONS
        .iter()
        .filter_map(|&(title, entries)| {
            let entries: Vec<NavEntry> = entries
                .iter()
                .filter(|entry| permissions.allows(entry.permissions))
                .copied()
                .collect();
            (!entries.is_empty()).then_some(NavSection { title, entries })
        })
        .collect()
}

/// The entry a path belongs to (most specific href wins).
pub fn entry_for_path(pathname: &str) -> Option<&'static NavEntry> {
    all_entries()
        .filter(|entry| entry.is_active(pathname))
        .max_by_key(|entry| entry.href.len())
}

/// Page guard: whether `permissions` may open `pathname`.
///
/// Paths outside the table carry no requirement.
pub fn can_access(permissions: &PermissionSet, pathname: &str) -> bool {
    entry_for_path(pathname).map_or(true, |entry| permissions.allows(entry.permissions))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(sections: &[NavSection]) -> Vec<&str> {
        sections.iter().map(|s| s.title).collect()
    }

    #[test]
    fn test_or_semantics() {
        let perms = PermissionSet::new(["p2"]);
        assert!(perms.allows(&[]));
        assert!(perms.allows(&["p1", "p2"]));
        assert!(!perms.allows(&["p1", "p3"]));
        assert!(PermissionSet::default().allows(&[]));
    }

    #[test]
    fn test_no_permissions_sees_only_open_entries() {
        let sections = visible_sections(&PermissionSet::default());

        assert_eq!(titles(&sections), vec!["Main", "Operations"]);
        assert_eq!(sections[0].entries.len(), 1);
        assert_eq!(sections[0].entries[0].name, "Dashboard");
        assert_eq!(sections[1].entries[0].name, "Roles & Permissions");
    }

    #[test]
    fn test_cashier_view() {
        let perms = PermissionSet::new(["orders:create", "customers:create"]);
        let sections = visible_sections(&perms);

        assert_eq!(titles(&sections), vec!["Main", "Operations"]);
        let main: Vec<&str> = sections[0].entries.iter().map(|e| e.name).collect();
        assert_eq!(main, vec!["Dashboard", "POS Terminal", "Orders", "Customers"]);
    }

    #[test]
    fn test_admin_sees_every_section() {
        let perms = PermissionSet::new([
            "orders:create",
            "customers:create",
            "inventory:create",
            "users:create",
            "settings:read",
            "settings:create",
        ]);
        let sections = visible_sections(&perms);
        assert_eq!(titles(&sections), vec!["Main", "Manage", "Operations", "Settings"]);
        let total: usize = sections.iter().map(|s| s.entries.len()).sum();
        assert_eq!(total, all_entries().count());
    }

    #[test]
    fn test_active_link_rule() {
        let home = entry_for_path("/dashboard").unwrap();
        assert_eq!(home.name, "Dashboard");
        assert!(!home.is_active("/dashboard/orders"));

        let orders = all_entries().find(|e| e.name == "Orders").unwrap();
        assert!(orders.is_active("/dashboard/orders"));
        assert!(orders.is_active("/dashboard/orders/abc"));
        assert!(!orders.is_active("/dashboard/orders-archive"));

        assert_eq!(entry_for_path("/dashboard/products/p-1").unwrap().name, "Products");
        assert!(entry_for_path("/login").is_none());
    }

    #[test]
    fn test_page_guard() {
        let perms = PermissionSet::new(["orders:create"]);
        assert!(can_access(&perms, "/dashboard"));
        assert!(can_access(&perms, "/dashboard/pos"));
        assert!(!can_access(&perms, "/dashboard/inventory/i-1"));
        assert!(can_access(&perms, "/dashboard/roles"));
        assert!(can_access(&perms, "/somewhere-else"));
    }
}
