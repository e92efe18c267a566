//! OTA install manifest template

use super::escape::escape_xml;

/// MIME type iOS expects for an OTA manifest
pub const PLIST_CONTENT_TYPE: &str = "application/x-plist";

/// Literal asset kind for the package entry
pub const ASSET_KIND: &str = "software-package";

/// Literal metadata kind
pub const METADATA_KIND: &str = "software";

/// Build a complete OTA manifest with one item and one asset.
///
/// All four fields are XML-escaped before interpolation. The layout
/// (ordering, indentation, DOCTYPE) is fixed; installers are picky about it.
pub fn build_plist(package_url: &str, bundle_id: &str, version: &str, app_name: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>items</key>
  <array><dict>
    <key>assets</key>
    <array><dict>
      <key>kind</key><string>{asset_kind}</string>
      <key>url</key><string>{url}</string>
    </dict></array>
    <key>metadata</key>
    <dict>
      <key>bundle-identifier</key><string>{bundle_id}</string>
      <key>bundle-version</key><string>{version}</string>
      <key>kind</key><string>{metadata_kind}</string>
      <key>title</key><string>{title}</string>
    </dict>
  </dict></array>
</dict>
</plist>"#,
        asset_kind = ASSET_KIND,
        url = escape_xml(package_url),
        bundle_id = escape_xml(bundle_id),
        version = escape_xml(version),
        metadata_kind = METADATA_KIND,
        title = escape_xml(app_name),
    )
}
