//! Builds what a share link recipient sees.

use famli_entity::guardian::Guardian;
use famli_entity::item::BoxItem;
use famli_entity::share::{ShareLink, ShareLinkType, SharedGuardian, SharedItem, SharedView};
use famli_entity::user::User;

/// Notice shown above memorial views.
pub const MEMORIAL_MESSAGE: &str =
    "Estas são as memórias e orientações deixadas com carinho por alguém que você ama.";

/// Notice shown above emergency views when the owner has not written one.
pub const EMERGENCY_MESSAGE: &str =
    "Estas informações foram compartilhadas com você para uso em uma situação de emergência.";

/// Projects the owner's content through `link`.
///
/// `items` must already be decrypted. Only items in the link's categories
/// are kept (all of them when the link has none). Memorial links also reveal
/// the guardians and the owner's email; emergency links show the owner's
/// emergency message, falling back to the default notice.
pub fn build_view(
    link: &ShareLink,
    owner: &User,
    items: Vec<BoxItem>,
    guardians: Vec<Guardian>,
    emergency_message: Option<String>,
) -> SharedView {
    let items = items
        .into_iter()
        .filter(|item| item.matches_categories(&link.categories))
        .map(|item| SharedItem {
            title: item.title,
            content: item.content,
            category: item.category,
            created_at: item.created_at,
        })
        .collect();

    let mut view = SharedView {
        link_name: link.name.clone(),
        link_type: link.link_type,
        owner_name: owner.name.clone(),
        message: None,
        items,
        guardians: None,
        owner_email: None,
    };

    match link.link_type {
        ShareLinkType::Normal => {}
        ShareLinkType::Emergency => {
            view.message = Some(
                emergency_message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| EMERGENCY_MESSAGE.to_string()),
            );
        }
        ShareLinkType::Memorial => {
            view.message = Some(MEMORIAL_MESSAGE.to_string());
            view.owner_email = Some(owner.email.clone());
            view.guardians = Some(
                guardians
                    .into_iter()
                    .map(|g| SharedGuardian {
                        name: g.name,
                        email: g.email,
                        phone: g.phone,
                        relationship: g.relationship,
                    })
                    .collect(),
            );
        }
    }

    view
}
