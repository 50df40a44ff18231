// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Built-in checks

pub mod carpark;
mod only_one_site;
mod site_latitude;

pub use carpark::{CarparkAccessibility, CarparkAccessibilityConfiguration};
pub use only_one_site::OnlyOneIfcSite;
pub use site_latitude::IfcSiteLatitude;
