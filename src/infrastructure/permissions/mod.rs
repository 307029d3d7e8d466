//! Permission infrastructure module

mod system;

pub use system::{DeviceCheck, SystemPermissions};
