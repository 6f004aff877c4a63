//! Role-filtered section menu
//!
//! The dashboard shows a section only if the current role is in the entry's
//! allowed set, or the entry declares no restriction. Pure derivation, no
//! state.

use crate::core::session::Role;

#[derive(Debug)]
pub struct MenuEntry {
    pub label: &'static str,
    pub command: &'static str,
    /// `None` means visible to every role
    pub allowed_roles: Option<&'static [Role]>,
}

pub const MENU: &[MenuEntry] = &[
    MenuEntry {
        label: "Projects",
        command: "vit project list",
        allowed_roles: None,
    },
    MenuEntry {
        label: "Wings & Units",
        command: "vit wing list --project <project>",
        allowed_roles: None,
    },
    MenuEntry {
        label: "Categories",
        command: "vit category list",
        allowed_roles: Some(&[Role::Admin, Role::Manager]),
    },
    MenuEntry {
        label: "Export",
        command: "vit project export",
        allowed_roles: Some(&[Role::Admin, Role::Manager]),
    },
    MenuEntry {
        label: "Cache",
        command: "vit cache info",
        allowed_roles: Some(&[Role::Admin]),
    },
];

/// Menu entries visible to the given role
pub fn visible_for(role: Role) -> Vec<&'static MenuEntry> {
    MENU.iter()
        .filter(|entry| match entry.allowed_roles {
            None => true,
            Some(roles) => roles.contains(&role),
        })
        .collect()
}
