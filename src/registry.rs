//! Key Registry - the fixed, ordered table of PSM settings keys
//!
//! A key's position in [`KEYS`] is its integer key, which is also the row
//! primary key in the `psm_data` table. Firmware decodes records by that
//! index, so entries are only ever appended.

use crate::{Error, Result};
use std::fmt;

/// Common prefix shared by every symbolic key name. Users may omit it.
pub const KEY_PREFIX: &str = "PlStorageData";

/// Every recognized key, in index order.
pub const KEYS: [&str; 169] = [
    "PlStorageDataDpsURL",
    "PlStorageDataCommonName",
    "PlStorageDataDpsScopeID",
    "PlStorageDataProjectID",
    "PlStorageDataRegisterToken",
    "PlStorageDataWiFiSSID",
    "PlStorageDataWiFiPassword",
    "PlStorageDataWiFiEncryption",
    "PlStorageDataIPAddress",
    "PlStorageDataSubnetMask",
    "PlStorageDataGateway",
    "PlStorageDataDNS",
    "PlStorageDataIPMethod",
    "PlStorageDataNetIfKind",
    "PlStorageDataIPv6IPAddress",
    "PlStorageDataIPv6SubnetMask",
    "PlStorageDataIPv6Gateway",
    "PlStorageDataIPv6DNS",
    "PlStorageDataWiFiApSSID",
    "PlStorageDataWiFiApPassword",
    "PlStorageDataWiFiApEncryption",
    "PlStorageDataWiFiApChannel",
    "PlStorageDataWiFiApIPAddress",
    "PlStorageDataWiFiApSubnetMask",
    "PlStorageDataWiFiApGateway",
    "PlStorageDataWiFiApDNS",
    "PlStorageDataProxyURL",
    "PlStorageDataProxyPort",
    "PlStorageDataProxyUserName",
    "PlStorageDataProxyPassword",
    "PlStorageDataEvpHubURL",
    "PlStorageDataEvpHubPort",
    "PlStorageDataEvpIotPlatform",
    "PlStorageDataPkiRootCerts",
    "PlStorageDataPkiRootCertsHash",
    "PlStorageDataEvpTls",
    "PlStorageDataDeviceManifest",
    "PlStorageDataDebugLogLevel",
    "PlStorageDataEventLogLevel",
    "PlStorageDataDebugLogDestination",
    "PlStorageDataLogFilter",
    "PlStorageDataLogUseFlash",
    "PlStorageDataStorageName",
    "PlStorageDataStorageSubDirectoryPath",
    "PlStorageDataDebugLogLevel2",
    "PlStorageDataEventLogLevel2",
    "PlStorageDataDebugLogDestination2",
    "PlStorageDataLogFilter2",
    "PlStorageDataLogUseFlash2",
    "PlStorageDataStorageName2",
    "PlStorageDataStorageSubDirectoryPath2",
    "PlStorageDataDebugLogLevel3",
    "PlStorageDataEventLogLevel3",
    "PlStorageDataDebugLogDestination3",
    "PlStorageDataLogFilter3",
    "PlStorageDataLogUseFlash3",
    "PlStorageDataStorageName3",
    "PlStorageDataStorageSubDirectoryPath3",
    "PlStorageDataDebugLogLevel4",
    "PlStorageDataEventLogLevel4",
    "PlStorageDataDebugLogDestination4",
    "PlStorageDataLogFilter4",
    "PlStorageDataLogUseFlash4",
    "PlStorageDataStorageName4",
    "PlStorageDataStorageSubDirectoryPath4",
    "PlStorageDataNTPServer",
    "PlStorageDataNTPSyncInterval",
    "PlStorageDataNTPPollingTime",
    "PlStorageDataSkipModeSettings",
    "PlStorageDataLimitPacketTime",
    "PlStorageDataLimitRTCCorrectionValue",
    "PlStorageDataSanityLimit",
    "PlStorageDataSlewModeSettings",
    "PlStorageDataStableRTCCorrectionValue",
    "PlStorageDataStableSyncNumber",
    "PlStorageDataSystemError",
    "PlStorageDataFactoryResetFlag",
    "PlStorageDataRTCErrorDetection",
    "PlStorageDataRTCPQAParameter",
    "PlStorageDataBatteryInformation",
    "PlStorageDataRTCNetworkInformation",
    "PlStorageDataRTCConfig",
    "PlStorageDataHoursMeter",
    "PlStorageDataSAS",
    "PlStorageDataQRModeStateFlag",
    "PlStorageDataInitialSettingFlag",
    "PlStorageDataHWInfoText",
    "PlStorageDataMCULoaderVersion",
    "PlStorageDataSensorLoaderVersion",
    "PlStorageDataMCUFWLastUpdate",
    "PlStorageDataSensorLoaderLastUpdate",
    "PlStorageDataSensorFWLastUpdate",
    "PlStorageDataSensorAIModelFlashAddress",
    "PlStorageDataSensorLoaderFlashAddress",
    "PlStorageDataSensorFWFlashAddress",
    "PlStorageDataAIModelParameterSlot0",
    "PlStorageDataAIModelParameterSlot1",
    "PlStorageDataAIModelParameterSlot2",
    "PlStorageDataAIModelParameterSlot3",
    "PlStorageDataAIModelParameterSlot4",
    "PlStorageDataAIModelParameterHashSlot1",
    "PlStorageDataAIModelParameterHashSlot2",
    "PlStorageDataAIModelParameterHashSlot3",
    "PlStorageDataAIModelParameterHashSlot4",
    "PlStorageDataLMTStd",
    "PlStorageDataPreWBStd",
    "PlStorageDataGAMMAStd",
    "PlStorageDataLSCStd",
    "PlStorageDataLSCRawStd",
    "PlStorageDataDEWARPStd",
    "PlStorageDataLMTCustom",
    "PlStorageDataPreWBCustom",
    "PlStorageDataGAMMACustom",
    "PlStorageDataGAMMAAutoCustom",
    "PlStorageDataLSCCustom",
    "PlStorageDataLSCRawCustom",
    "PlStorageDataDEWARPCustom",
    "PlStorageDataAIISPAIModelParameterSlot0",
    "PlStorageDataAIISPLoaderFlashAddress",
    "PlStorageDataAIISPFWFlashAddress",
    "PlStorageDataAIISPAIModelParameterSlot1",
    "PlStorageDataAIISPAIModelParameterSlot2",
    "PlStorageDataAIISPAIModelParameterSlot3",
    "PlStorageDataAIISPAIModelParameterSlot4",
    "PlStorageDataAIModelSlotInfo",
    "PlStorageDataAIISPAIModelSlotInfo",
    "PlStorageDataFwMgrBinaryInfo0",
    "PlStorageDataFwMgrBinaryInfo1",
    "PlStorageDataFwMgrBinaryInfo2",
    "PlStorageDataFwMgrBinaryInfo3",
    "PlStorageDataFwMgrBinaryInfo4",
    "PlStorageDataFwMgrBinaryInfo5",
    "PlStorageDataFwMgrBinaryInfo6",
    "PlStorageDataFwMgrBinaryInfo7",
    "PlStorageDataFwMgrBinaryInfo8",
    "PlStorageDataFwMgrBinaryInfo9",
    "PlStorageDataFwMgrBinaryInfo10",
    "PlStorageDataFwMgrBinaryInfo11",
    "PlStorageDataFwMgrBinaryInfo12",
    "PlStorageDataFwMgrBinaryInfo13",
    "PlStorageDataFwMgrBinaryInfo14",
    "PlStorageDataFwMgrBinaryInfo15",
    "PlStorageDataFwMgrBinaryInfo16",
    "PlStorageDataFwMgrBinaryInfo17",
    "PlStorageDataFwMgrBinaryInfo18",
    "PlStorageDataFwMgrBinaryInfo19",
    "PlStorageDataFwMgrBinaryInfo20",
    "PlStorageDataFwMgrBinaryInfo21",
    "PlStorageDataFwMgrBinaryInfo22",
    "PlStorageDataFwMgrBinaryInfo23",
    "PlStorageDataFwMgrBinaryInfo24",
    "PlStorageDataFwMgrBinaryInfo25",
    "PlStorageDataFwMgrBinaryInfo26",
    "PlStorageDataFwMgrBinaryInfo27",
    "PlStorageDataFwMgrBinaryInfo28",
    "PlStorageDataFwMgrBinaryInfo29",
    "PlStorageDataFwMgrBinaryInfoMcuFirmware",
    "PlStorageDataEsfSensorConfig",
    "PlStorageDataSpiBootLoader",
    "PlStorageDataSpiBootFirmware",
    "PlStorageDataSpiBootAIModel",
    "PlStorageDataPreInstallAIModelInfo",
    "PlStorageDataPreInstallAIModel",
    "PlStorageDataInputTensorOnlyModel",
    "PlStorageDataInputTensorOnlyParam",
    "PlStorageDataExceptionFactor",
    "PlStorageDataExceptionInfo",
    "PlStorageDataEvpExceptionFactor",
    "PlStorageDataMigrationDone",
];

/// A registry entry: symbolic name and its stable index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEntry {
    pub name: &'static str,
    pub index: i64,
}

impl fmt::Display for KeyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.index)
    }
}

/// Lookup capability over [`KEYS`].
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyRegistry;

impl KeyRegistry {
    /// All entries in index order
    pub fn entries(&self) -> impl Iterator<Item = KeyEntry> {
        KEYS.iter().enumerate().map(|(i, &name)| KeyEntry {
            name,
            index: i as i64,
        })
    }

    pub fn len(&self) -> usize {
        KEYS.len()
    }

    pub fn is_empty(&self) -> bool {
        KEYS.is_empty()
    }

    /// Find an entry by its full symbolic name
    pub fn lookup(&self, name: &str) -> Option<KeyEntry> {
        self.entries().find(|entry| entry.name == name)
    }

    /// Find an entry by name with [`KEY_PREFIX`] left off
    pub fn lookup_short(&self, short: &str) -> Option<KeyEntry> {
        self.entries()
            .find(|entry| entry.name.strip_prefix(KEY_PREFIX) == Some(short))
    }

    /// Symbolic name for an index, if the index is inside the registry
    pub fn name_of(&self, index: i64) -> Option<&'static str> {
        usize::try_from(index).ok().and_then(|i| KEYS.get(i).copied())
    }

    /// Resolve user input to a numeric key.
    ///
    /// Order matters: exact name, then short name, then a base-10 integer.
    /// Integers are passed through without a registry bounds check since the
    /// table's primary key is an open integer column.
    pub fn resolve(&self, input: &str) -> Result<ResolvedKey> {
        if let Some(entry) = self.lookup(input).or_else(|| self.lookup_short(input)) {
            return Ok(ResolvedKey {
                index: entry.index,
                name: Some(entry.name),
            });
        }

        match input.trim().parse::<i64>() {
            Ok(index) => Ok(ResolvedKey {
                index,
                name: self.name_of(index),
            }),
            Err(_) => Err(Error::KeyResolution(input.to_string())),
        }
    }
}

/// Resolve against the built-in registry
pub fn resolve_key(input: &str) -> Result<ResolvedKey> {
    KeyRegistry.resolve(input)
}

/// Outcome of key resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedKey {
    /// Numeric key written to the `key` column
    pub index: i64,
    /// Registry name, `None` for integers outside the registry
    pub name: Option<&'static str>,
}

impl fmt::Display for ResolvedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => write!(f, "{} ({})", name, self.index),
            None => write!(f, "<unregistered> ({})", self.index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_entry_resolves_by_full_and_short_name() {
        for entry in KeyRegistry.entries() {
            let full = resolve_key(entry.name).unwrap();
            assert_eq!(full.index, entry.index, "full name {}", entry.name);

            let short = entry.name.strip_prefix(KEY_PREFIX).unwrap();
            let resolved = resolve_key(short).unwrap();
            assert_eq!(resolved.index, entry.index, "short name {}", short);
            assert_eq!(resolved.name, Some(entry.name));
        }
    }

    #[test]
    fn test_stable_indices() {
        assert_eq!(KeyRegistry.len(), 169);
        assert_eq!(KeyRegistry.lookup("PlStorageDataDpsURL").unwrap().index, 0);
        assert_eq!(KeyRegistry.lookup("PlStorageDataWiFiSSID").unwrap().index, 5);
        assert_eq!(KeyRegistry.lookup("PlStorageDataPkiRootCerts").unwrap().index, 33);
        assert_eq!(KeyRegistry.lookup("PlStorageDataMigrationDone").unwrap().index, 168);
    }

    #[test]
    fn test_names_are_unique_and_prefixed() {
        let mut seen = std::collections::HashSet::new();
        for name in KEYS {
            assert!(name.starts_with(KEY_PREFIX), "{name}");
            assert!(seen.insert(name), "duplicate key {name}");
        }
    }

    #[test]
    fn test_integer_passthrough() {
        assert_eq!(resolve_key("5").unwrap().index, 5);
        assert_eq!(resolve_key("5").unwrap().name, Some("PlStorageDataWiFiSSID"));

        let out_of_range = resolve_key("5000").unwrap();
        assert_eq!(out_of_range.index, 5000);
        assert_eq!(out_of_range.name, None);

        assert_eq!(resolve_key("-1").unwrap().index, -1);
        assert_eq!(resolve_key(" 12 ").unwrap().index, 12);
    }

    #[test]
    fn test_unknown_keys_fail() {
        for input in ["", "WiFi", "wifissid", "PlStorageData", "0x10", "1.5", "99999999999999999999"] {
            assert!(
                matches!(resolve_key(input), Err(Error::KeyResolution(_))),
                "{input:?} should not resolve"
            );
        }
    }

    #[test]
    fn test_no_partial_matching() {
        // "DebugLogLevel" must not match "DebugLogLevel2"
        let resolved = resolve_key("DebugLogLevel").unwrap();
        assert_eq!(resolved.name, Some("PlStorageDataDebugLogLevel"));
        assert!(resolve_key("DebugLogLev").is_err());
    }

    #[test]
    fn test_name_of() {
        assert_eq!(KeyRegistry.name_of(0), Some("PlStorageDataDpsURL"));
        assert_eq!(KeyRegistry.name_of(169), None);
        assert_eq!(KeyRegistry.name_of(-3), None);
    }
}
