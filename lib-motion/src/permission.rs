use core::fmt;

use crate::MotionError;

/// The two sensors the recorder depends on.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensor
{
    HeadphoneMotion,
    Camera,
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::HeadphoneMotion => write!(f, "headphone motion sensor"),
            Self::Camera => write!(f, "camera"),
        }
    }
}

/// Authorization state as reported by the platform for a sensor.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus
{
    NotDetermined,
    Restricted,
    Denied,
    Authorized,
}

/// Decides whether headphone motion tracking may start. `available` tells whether the
/// connected headphones report motion at all. Only an explicit denial stops it, an
/// undetermined status means the platform will prompt the user once updates are requested.
/// 
pub fn authorize_motion(available: bool, status: AuthorizationStatus) -> Result<(), MotionError> {
    if !available {
        log::warn!("Headphone motion is not available on this device");
        return Err(MotionError::DeviceUnavailable(Sensor::HeadphoneMotion));
    }
    match status {
        AuthorizationStatus::Authorized => log::info!("User previously allowed motion tracking"),
        AuthorizationStatus::Restricted => log::info!("User access to motion updates is restricted"),
        AuthorizationStatus::NotDetermined => {
            log::info!("Permission for device motion tracking unknown; will prompt for access")
        }
        AuthorizationStatus::Denied => {
            log::warn!("User denied access to motion updates; will not start motion tracking");
            return Err(MotionError::PermissionDenied(Sensor::HeadphoneMotion));
        }
    }
    Ok(())
}

/// Decides whether camera capture may start. Capture needs a camera and an explicit grant, any
/// pending prompt has to be resolved by the caller before asking again.
/// 
pub fn authorize_camera(available: bool, status: AuthorizationStatus) -> Result<(), MotionError> {
    if !available {
        log::warn!("Unable to access camera!");
        return Err(MotionError::DeviceUnavailable(Sensor::Camera));
    }
    match status {
        AuthorizationStatus::Authorized => Ok(()),
        _ => {
            log::warn!("Camera access denied! ({:?})", status);
            Err(MotionError::PermissionDenied(Sensor::Camera))
        }
    }
}
