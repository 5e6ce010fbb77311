//! The album state machine
//!
//! [`decide`] maps an album and an [`Action`] to a [`Decision`]: either a
//! side effect for the caller to perform (upload, removal, cover lookup) or a
//! [`Charge`] whose [`PaymentIntent`] is applied by [`settle`] once the
//! payment is approved. Neither function performs I/O.

use crate::action::Action;
use crate::error::LifecycleError;
use crate::fees::FeeSchedule;
use crate::transition::validate_transition;
use realpic_album::{Album, AlbumPatch, AlbumStatus, DeliveryAddress, FilmPackage, Price};
use serde::{Deserialize, Serialize};

/// What the gallery lets the user do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryAccess {
    /// Photo deletion offered
    pub can_delete: bool,
}

impl GalleryAccess {
    /// Deletion needs pro mode and an album not yet locked for fulfillment
    #[inline]
    #[must_use]
    pub fn for_album(album: &Album) -> Self {
        Self {
            can_delete: album.pro_mode && album.status.is_editable(),
        }
    }
}

/// Mutation to apply once a payment is approved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentIntent {
    /// Add the package's slots to the limit
    CapacityUpgrade { package: FilmPackage },
    /// Clear demo mode
    DemoUpgrade,
    /// Turn plus mode on
    PlusMode,
    /// Turn pro mode on, and plus mode too when it was off at request time
    ProMode { include_plus: bool },
    /// Record the address and ship
    Delivery { address: DeliveryAddress },
}

impl PaymentIntent {
    /// Short name for logs
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            PaymentIntent::CapacityUpgrade { .. } => "capacity upgrade",
            PaymentIntent::DemoUpgrade => "demo upgrade",
            PaymentIntent::PlusMode => "plus mode",
            PaymentIntent::ProMode { .. } => "pro mode",
            PaymentIntent::Delivery { .. } => "delivery",
        }
    }
}

/// A payment the user must approve before the intent applies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Charge {
    pub price: Price,
    pub intent: PaymentIntent,
}

/// Outcome of evaluating an action against an album
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Upload a photo, append it, then recompute the status
    Upload,
    /// Remove this photo, then recompute the status
    RemovePhoto { url: String },
    /// Look up a cover for the (trimmed) name and store both
    Rename { name: String },
    /// Show the gallery; nothing to write
    OpenGallery(GalleryAccess),
    /// Collect a payment first
    Charge(Charge),
}

/// Record update produced by an approved payment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// Written first
    pub patch: AlbumPatch,
    /// Re-read the album afterwards and write the status its photo count implies
    pub recompute_status: bool,
}

fn locked(album: &Album, action: &Action) -> Result<(), LifecycleError> {
    if album.status.is_locked() {
        Err(LifecycleError::InvalidState {
            status: album.status,
            action: action.name(),
        })
    } else {
        Ok(())
    }
}

fn ensure_capacity(album: &Album) -> Result<(), LifecycleError> {
    if album.remaining_slots() == 0 {
        Err(LifecycleError::CapacityExceeded {
            limit: album.photo_limit,
        })
    } else {
        Ok(())
    }
}

/// Evaluate `action` against `album`.
///
/// # Errors
/// The [`LifecycleError`] naming the rule the action breaks.
pub fn decide(album: &Album, action: &Action, fees: &FeeSchedule) -> Result<Decision, LifecycleError> {
    action.precheck()?;

    match action {
        Action::AddPhoto => {
            locked(album, action)?;
            ensure_capacity(album)?;
            Ok(Decision::Upload)
        }
        Action::DeletePhoto { index } => {
            locked(album, action)?;
            album
                .photos
                .get(*index)
                .map(|url| Decision::RemovePhoto { url: url.clone() })
                .ok_or(LifecycleError::IndexOutOfRange {
                    index: *index,
                    len: album.photos.len(),
                })
        }
        Action::RequestCapacityUpgrade { photos } => {
            let package =
                FilmPackage::for_photos(*photos).ok_or(LifecycleError::InvalidPackage(*photos))?;
            locked(album, action)?;
            if album.demo_mode {
                return Err(LifecycleError::DemoRestricted);
            }
            Ok(Decision::Charge(Charge {
                price: package.price,
                intent: PaymentIntent::CapacityUpgrade { package },
            }))
        }
        Action::RequestDemoUpgrade => {
            locked(album, action)?;
            if !album.demo_mode {
                return Err(LifecycleError::AlreadyUpgraded);
            }
            let price = FilmPackage::price_for_limit(album.photo_limit)
                .ok_or(LifecycleError::UndefinedPrice(album.photo_limit))?;
            Ok(Decision::Charge(Charge {
                price,
                intent: PaymentIntent::DemoUpgrade,
            }))
        }
        Action::TogglePlusMode => {
            locked(album, action)?;
            ensure_capacity(album)?;
            if album.plus_mode {
                Ok(Decision::Upload)
            } else {
                Ok(Decision::Charge(Charge {
                    price: fees.plus_mode,
                    intent: PaymentIntent::PlusMode,
                }))
            }
        }
        Action::RequestProMode => {
            if album.pro_mode {
                return Ok(Decision::OpenGallery(GalleryAccess::for_album(album)));
            }
            locked(album, action)?;
            let (price, include_plus) = if album.plus_mode {
                (fees.pro_mode_with_plus, false)
            } else {
                (fees.pro_mode, true)
            };
            Ok(Decision::Charge(Charge {
                price,
                intent: PaymentIntent::ProMode { include_plus },
            }))
        }
        Action::SubmitDeliveryAddress { address } => {
            if album.status != AlbumStatus::ReadyToPrint {
                return Err(LifecycleError::InvalidState {
                    status: album.status,
                    action: action.name(),
                });
            }
            Ok(Decision::Charge(Charge {
                price: fees.delivery,
                intent: PaymentIntent::Delivery {
                    address: address.trimmed(),
                },
            }))
        }
        Action::RenameAlbum { name } => Ok(Decision::Rename {
            name: name.trim().to_string(),
        }),
        Action::OpenGallery => Ok(Decision::OpenGallery(GalleryAccess::for_album(album))),
    }
}

/// Turn an approved payment into the record update for `album`.
///
/// `album` should be freshly read; the capacity upgrade adds to its current limit.
///
/// # Errors
/// `IllegalTransition` when a delivery settles for an album that is no
/// longer `ReadyToPrint`.
pub fn settle(album: &Album, intent: &PaymentIntent) -> Result<Settlement, LifecycleError> {
    let settlement = match intent {
        PaymentIntent::CapacityUpgrade { package } => Settlement {
            patch: AlbumPatch::new()
                .with_photo_limit(album.photo_limit.saturating_add(package.photos)),
            recompute_status: true,
        },
        PaymentIntent::DemoUpgrade => Settlement {
            patch: AlbumPatch::new().with_demo_mode(false),
            recompute_status: false,
        },
        PaymentIntent::PlusMode => Settlement {
            patch: AlbumPatch::new().with_plus_mode(true),
            recompute_status: false,
        },
        PaymentIntent::ProMode { include_plus } => {
            let mut patch = AlbumPatch::new().with_pro_mode(true);
            if *include_plus {
                patch = patch.with_plus_mode(true);
            }
            Settlement {
                patch,
                recompute_status: false,
            }
        }
        PaymentIntent::Delivery { address } => {
            validate_transition(album.status, AlbumStatus::OnTheWay)?;
            Settlement {
                patch: AlbumPatch::new()
                    .with_status(AlbumStatus::OnTheWay)
                    .with_address(address.clone()),
                recompute_status: false,
            }
        }
    };
    Ok(settlement)
}
