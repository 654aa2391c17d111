/// Permission evaluation: decides whether a file's mode is "unusual".
///
/// Only the low nine permission bits take part in the decision; setuid,
/// setgid, sticky and file-type bits are masked off first.
use serde::{Deserialize, Serialize};

/// Mask selecting the user/group/other rwx bits.
pub const PERMISSION_MASK: u32 = 0o777;

/// Modes considered normal under [`PermissionPolicy::AllowList`].
pub const NORMAL_PERMISSIONS: &[u32] = &[0o600, 0o644, 0o700, 0o744, 0o755];

/// Which test flags a file. One policy applies to a whole scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionPolicy {
    /// Flag any mode not in [`NORMAL_PERMISSIONS`].
    #[default]
    AllowList,
    /// Flag files that are world-writable or world-executable.
    ///
    /// Read access for others is not part of this check: a world-readable
    /// file such as 0644 stays normal. This narrows the usual "others have
    /// any of read, write or execute" rule so the two policies agree on
    /// the commonest file mode.
    OtherAccess,
}

impl PermissionPolicy {
    pub fn is_unusual(self, mode: u32) -> bool {
        let bits = mode & PERMISSION_MASK;
        match self {
            Self::AllowList => !NORMAL_PERMISSIONS.contains(&bits),
            Self::OtherAccess => bits & 0o003 != 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AllowList => "allow-list",
            Self::OtherAccess => "other-access",
        }
    }
}

/// Render the permission bits as three octal digits, e.g. `"644"`.
pub fn format_permissions(mode: u32) -> String {
    format!("{:03o}", mode & PERMISSION_MASK)
}
