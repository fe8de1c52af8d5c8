// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::password::PasswordHasher;
use crate::auth::TokenService;
use crate::clock::Clock;
use crate::store::UserDirectory;

/// Shared, read-only handles used by the gate and the handlers.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub clock: Arc<dyn Clock>,
    pub users: Arc<dyn UserDirectory>,
    pub passwords: Arc<dyn PasswordHasher>,
}

impl AppState {
    pub fn new(
        tokens: TokenService,
        clock: Arc<dyn Clock>,
        users: Arc<dyn UserDirectory>,
        passwords: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            tokens: Arc::new(tokens),
            clock,
            users,
            passwords,
        }
    }
}
