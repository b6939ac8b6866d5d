use swarm_types::BlockHeight;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VrfError {
    #[error("block hash for {height} is unavailable (head {head})")]
    Unavailable { height: BlockHeight, head: BlockHeight },

    #[error("block {height} recorded out of order (head {head})")]
    OutOfOrder { height: BlockHeight, head: BlockHeight },
}
