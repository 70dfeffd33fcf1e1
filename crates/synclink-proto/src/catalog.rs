//! Closed catalogs of request and signal kinds.
//!
//! The numbering is fixed by the daemon's wire protocol; requests start
//! at 1 (0 is reserved for the unimplemented-reply marker), signals at 0.

/// Request kinds the daemon understands, keyed by the envelope `num`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    // Login
    LoginRequestToken = 1,
    // User
    UserDbIdList,
    UserInfoList,
    UserDelete,
    UserAvailableDrives,
    UserIdFromUserDbId,
    // Account
    AccountInfoList,
    // Drive
    DriveInfoList,
    DriveInfo,
    DriveIdFromDriveDbId,
    DriveIdFromSyncDbId,
    DriveDefaultColor,
    DriveUpdate,
    DriveDelete,
    DriveGetOfflineFilesTotalSize,
    DriveSearch,
    // Sync
    SyncInfoList,
    SyncStart,
    SyncStop,
    SyncStatus,
    SyncIsRunning,
    SyncAdd,
    SyncAdd2,
    SyncStartAfterLogin,
    SyncDelete,
    SyncGetPublicLinkUrl,
    SyncGetPrivateLinkUrl,
    SyncAskForStatus,
    SyncSetSupportsVirtualFiles,
    SyncSetRootPinState,
    SyncPropagateSyncListChange,
    SyncNodeList,
    SyncNodeSetList,
    // Node
    NodePath,
    NodeInfo,
    NodeSubfolders,
    NodeSubfolders2,
    NodeFolderSize,
    NodeCreateMissingFolders,
    // Error
    ErrorInfoList,
    ErrorGetConflicts,
    ErrorDeleteServer,
    ErrorDeleteSync,
    ErrorDeleteInvalidToken,
    ErrorResolveConflicts,
    ErrorResolveUnsupportedChar,
    // Exclusion templates
    ExclTemplGetExcluded,
    ExclTemplGetList,
    ExclTemplSetList,
    ExclTemplPropagateChange,
    // Parameters
    ParametersInfo,
    ParametersUpdate,
    // Utility
    UtilityFindGoodPathForNewSync,
    UtilityBestVfsAvailableMode,
    UtilityShowShortcut,
    UtilitySetShowShortcut,
    UtilityActivateLoadInfo,
    UtilityCheckCommStatus,
    UtilityHasSystemLaunchOnStartup,
    UtilityHasLaunchOnStartup,
    UtilitySetLaunchOnStartup,
    UtilitySetAppState,
    UtilityGetAppState,
    UtilitySendLogToSupport,
    UtilityCancelLogToSupport,
    UtilityGetLogEstimatedSize,
    UtilityCrash,
    UtilityQuit,
    UtilityDisplayClientReport,
    // Updater
    UpdaterChangeChannel,
    UpdaterVersionInfo,
    UpdaterState,
    UpdaterStartInstaller,
    UpdaterSkipVersion,
}

impl RequestKind {
    /// Every kind, in catalog order.
    pub const ALL: &'static [RequestKind] = &[
        RequestKind::LoginRequestToken,
        RequestKind::UserDbIdList,
        RequestKind::UserInfoList,
        RequestKind::UserDelete,
        RequestKind::UserAvailableDrives,
        RequestKind::UserIdFromUserDbId,
        RequestKind::AccountInfoList,
        RequestKind::DriveInfoList,
        RequestKind::DriveInfo,
        RequestKind::DriveIdFromDriveDbId,
        RequestKind::DriveIdFromSyncDbId,
        RequestKind::DriveDefaultColor,
        RequestKind::DriveUpdate,
        RequestKind::DriveDelete,
        RequestKind::DriveGetOfflineFilesTotalSize,
        RequestKind::DriveSearch,
        RequestKind::SyncInfoList,
        RequestKind::SyncStart,
        RequestKind::SyncStop,
        RequestKind::SyncStatus,
        RequestKind::SyncIsRunning,
        RequestKind::SyncAdd,
        RequestKind::SyncAdd2,
        RequestKind::SyncStartAfterLogin,
        RequestKind::SyncDelete,
        RequestKind::SyncGetPublicLinkUrl,
        RequestKind::SyncGetPrivateLinkUrl,
        RequestKind::SyncAskForStatus,
        RequestKind::SyncSetSupportsVirtualFiles,
        RequestKind::SyncSetRootPinState,
        RequestKind::SyncPropagateSyncListChange,
        RequestKind::SyncNodeList,
        RequestKind::SyncNodeSetList,
        RequestKind::NodePath,
        RequestKind::NodeInfo,
        RequestKind::NodeSubfolders,
        RequestKind::NodeSubfolders2,
        RequestKind::NodeFolderSize,
        RequestKind::NodeCreateMissingFolders,
        RequestKind::ErrorInfoList,
        RequestKind::ErrorGetConflicts,
        RequestKind::ErrorDeleteServer,
        RequestKind::ErrorDeleteSync,
        RequestKind::ErrorDeleteInvalidToken,
        RequestKind::ErrorResolveConflicts,
        RequestKind::ErrorResolveUnsupportedChar,
        RequestKind::ExclTemplGetExcluded,
        RequestKind::ExclTemplGetList,
        RequestKind::ExclTemplSetList,
        RequestKind::ExclTemplPropagateChange,
        RequestKind::ParametersInfo,
        RequestKind::ParametersUpdate,
        RequestKind::UtilityFindGoodPathForNewSync,
        RequestKind::UtilityBestVfsAvailableMode,
        RequestKind::UtilityShowShortcut,
        RequestKind::UtilitySetShowShortcut,
        RequestKind::UtilityActivateLoadInfo,
        RequestKind::UtilityCheckCommStatus,
        RequestKind::UtilityHasSystemLaunchOnStartup,
        RequestKind::UtilityHasLaunchOnStartup,
        RequestKind::UtilitySetLaunchOnStartup,
        RequestKind::UtilitySetAppState,
        RequestKind::UtilityGetAppState,
        RequestKind::UtilitySendLogToSupport,
        RequestKind::UtilityCancelLogToSupport,
        RequestKind::UtilityGetLogEstimatedSize,
        RequestKind::UtilityCrash,
        RequestKind::UtilityQuit,
        RequestKind::UtilityDisplayClientReport,
        RequestKind::UpdaterChangeChannel,
        RequestKind::UpdaterVersionInfo,
        RequestKind::UpdaterState,
        RequestKind::UpdaterStartInstaller,
        RequestKind::UpdaterSkipVersion,
    ];

    /// The wire discriminant for this kind.
    pub fn num(self) -> i32 {
        self as i32
    }

    /// Look up a kind by its wire discriminant.
    pub fn from_num(num: i32) -> Option<Self> {
        let first = RequestKind::LoginRequestToken.num();
        let idx = usize::try_from(num.checked_sub(first)?).ok()?;
        Self::ALL.get(idx).copied()
    }
}

/// Signal kinds the daemon may push, keyed by the envelope `num`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    // User
    UserAdded = 0,
    UserUpdated,
    UserStatusChanged,
    UserRemoved,
    // Account
    AccountAdded,
    AccountUpdated,
    AccountRemoved,
    // Drive
    DriveAdded,
    DriveUpdated,
    DriveQuotaUpdated,
    DriveRemoved,
    DriveDeleteFailed,
    // Sync
    SyncAdded,
    SyncUpdated,
    SyncRemoved,
    SyncProgressInfo,
    SyncCompletedItem,
    SyncVfsConversionCompleted,
    SyncDeleteFailed,
    // Node
    NodeFolderSizeCompleted,
    NodeFixConflictedFilesCompleted,
    // Updater
    UpdaterShowDialog,
    UpdaterStateChanged,
    // Utility
    UtilityShowNotification,
    UtilityNewBigFolder,
    UtilityErrorAdded,
    UtilityErrorsCleared,
    UtilityShowSettings,
    UtilityShowSynthesis,
    UtilityLogUploadStatusUpdated,
    UtilityQuit,
}

impl SignalKind {
    /// Every kind, in catalog order.
    pub const ALL: &'static [SignalKind] = &[
        SignalKind::UserAdded,
        SignalKind::UserUpdated,
        SignalKind::UserStatusChanged,
        SignalKind::UserRemoved,
        SignalKind::AccountAdded,
        SignalKind::AccountUpdated,
        SignalKind::AccountRemoved,
        SignalKind::DriveAdded,
        SignalKind::DriveUpdated,
        SignalKind::DriveQuotaUpdated,
        SignalKind::DriveRemoved,
        SignalKind::DriveDeleteFailed,
        SignalKind::SyncAdded,
        SignalKind::SyncUpdated,
        SignalKind::SyncRemoved,
        SignalKind::SyncProgressInfo,
        SignalKind::SyncCompletedItem,
        SignalKind::SyncVfsConversionCompleted,
        SignalKind::SyncDeleteFailed,
        SignalKind::NodeFolderSizeCompleted,
        SignalKind::NodeFixConflictedFilesCompleted,
        SignalKind::UpdaterShowDialog,
        SignalKind::UpdaterStateChanged,
        SignalKind::UtilityShowNotification,
        SignalKind::UtilityNewBigFolder,
        SignalKind::UtilityErrorAdded,
        SignalKind::UtilityErrorsCleared,
        SignalKind::UtilityShowSettings,
        SignalKind::UtilityShowSynthesis,
        SignalKind::UtilityLogUploadStatusUpdated,
        SignalKind::UtilityQuit,
    ];

    /// The wire discriminant for this kind.
    pub fn num(self) -> i32 {
        self as i32
    }

    /// Look up a kind by its wire discriminant.
    pub fn from_num(num: i32) -> Option<Self> {
        let idx = usize::try_from(num).ok()?;
        Self::ALL.get(idx).copied()
    }
}
