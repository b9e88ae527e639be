use derive_new::new;

use super::super::id::UserId;

#[derive(new)]
pub struct CreateToken {
    pub user_id: UserId,
}
