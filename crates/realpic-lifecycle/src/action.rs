//! User actions on an album

use crate::error::LifecycleError;
use realpic_album::{DeliveryAddress, FilmPackage};
use serde::{Deserialize, Serialize};

/// Something the user asked to do with one album
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Capture a photo into the next free slot
    AddPhoto,
    /// Remove the photo at `index`
    DeletePhoto { index: usize },
    /// Buy `photos` more slots from the catalog
    RequestCapacityUpgrade { photos: u32 },
    /// Turn a demo album into real film
    RequestDemoUpgrade,
    /// Buy plus mode, or use it to upload from the library
    TogglePlusMode,
    /// Buy pro mode, or open the gallery with it
    RequestProMode,
    /// Pay for printing and ship to `address`
    SubmitDeliveryAddress { address: DeliveryAddress },
    /// Change the display name (and cover)
    RenameAlbum { name: String },
    /// View the photos
    OpenGallery,
}

impl Action {
    /// Human-readable name, used in error messages and logs
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddPhoto => "add photo",
            Action::DeletePhoto { .. } => "delete photo",
            Action::RequestCapacityUpgrade { .. } => "capacity upgrade",
            Action::RequestDemoUpgrade => "demo upgrade",
            Action::TogglePlusMode => "plus mode",
            Action::RequestProMode => "pro mode",
            Action::SubmitDeliveryAddress { .. } => "delivery",
            Action::RenameAlbum { .. } => "rename",
            Action::OpenGallery => "open gallery",
        }
    }

    /// Validate what can be validated from the request alone
    ///
    /// # Errors
    /// `EmptyName`, `ValidationFailed` or `InvalidPackage`.
    pub fn precheck(&self) -> Result<(), LifecycleError> {
        match self {
            Action::RenameAlbum { name } if name.trim().is_empty() => Err(LifecycleError::EmptyName),
            Action::SubmitDeliveryAddress { address } => {
                let missing = address.missing_fields();
                if missing.is_empty() {
                    Ok(())
                } else {
                    Err(LifecycleError::ValidationFailed { missing })
                }
            }
            Action::RequestCapacityUpgrade { photos } => FilmPackage::for_photos(*photos)
                .map(|_| ())
                .ok_or(LifecycleError::InvalidPackage(*photos)),
            _ => Ok(()),
        }
    }
}
