// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Black-box specs for the `fleetctl` binary, run against a fresh
//! `FLEET_STATE_DIR` per test. These cover the end-to-end scenarios that
//! don't require a live game-server connection (a dead-lettered spawn
//! when the adapter can't connect is itself one of the scenarios).

mod fleet;
