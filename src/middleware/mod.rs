// ABOUTME: Request middleware: bearer-token authentication for protected routes
// ABOUTME: Exposes the AuthedUser extractor used by every write handler
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Contributors

pub mod auth;

pub use auth::AuthedUser;
