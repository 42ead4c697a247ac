// Winks Companion Engine — Replica Provisioner
//
// Find-or-create the Winks replica under the fixed host account.
// Selection order when replicas exist: exact slug match, else the first
// listed entry (logged distinctly at warn level). Creation happens
// only when the listing is empty, so at most one remote user and one remote
// replica are ever created.
//
// One provisioning pass runs at a time: callers racing on first use
// serialize behind the in-flight lock instead of both observing "no
// replicas" and double-creating. The result is not cached across calls —
// the account-existence check runs every time.

use std::sync::Arc;

use log::{info, warn};
use tokio::sync::Mutex;

use crate::atoms::constants::{HOST_USER_ID, HOST_USER_NAME, REPLICA_SLUG};
use crate::atoms::error::EngineResult;
use crate::atoms::traits::ReplicaDirectory;
use crate::atoms::types::{CreateReplicaRequest, CreateUserRequest, Replica};

pub struct ReplicaProvisioner {
    directory: Arc<dyn ReplicaDirectory>,
    in_flight: Mutex<()>,
}

impl ReplicaProvisioner {
    pub fn new(directory: Arc<dyn ReplicaDirectory>) -> Self {
        ReplicaProvisioner {
            directory,
            in_flight: Mutex::new(()),
        }
    }

    /// Resolve the replica handle, creating the host user and the replica on
    /// first use. Idempotent: once the replica exists, calls perform read
    /// operations only.
    pub async fn ensure_replica(&self) -> EngineResult<Replica> {
        let _guard = self.in_flight.lock().await;

        // A failed lookup is the normal first-run case, not an error; the
        // follow-up create surfaces the real problem if there is one.
        match self.directory.get_user(HOST_USER_ID).await {
            Ok(user) => info!("[engine] Host user '{}' present", user.id),
            Err(err) => {
                info!("[engine] Host user lookup failed ({err}) — creating '{HOST_USER_ID}'");
                self.directory
                    .create_user(&CreateUserRequest {
                        id: HOST_USER_ID.to_string(),
                        name: HOST_USER_NAME.to_string(),
                    })
                    .await?;
            }
        }

        let replicas = self.directory.list_replicas().await?;
        if !replicas.items.is_empty() {
            if let Some(replica) = replicas.items.iter().find(|r| r.slug == REPLICA_SLUG) {
                info!(
                    "[engine] Using replica '{}' ({})",
                    replica.slug, replica.uuid
                );
                return Ok(replica.clone());
            }
            // No slug match: fall back to the first listed replica.
            let first = replicas.items[0].clone();
            warn!(
                "[engine] No replica with slug '{}' among {} listed — falling back to '{}' ({})",
                REPLICA_SLUG,
                replicas.items.len(),
                first.slug,
                first.uuid
            );
            return Ok(first);
        }

        let request = CreateReplicaRequest::host_default();
        let uuid = self.directory.create_replica(&request).await?;
        info!("[engine] Created replica '{}' ({})", request.slug, uuid);

        let replica = self.directory.get_replica(&uuid).await?;
        Ok(replica)
    }
}
