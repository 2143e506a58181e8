//! C++ header generation
//!
//! Renders one header for a set of schema sections. Each section gets:
//! - a packed wire struct, one byte array per field sized to its width
//! - a logical struct with `NAME`, `HASH`, `PACKED_SIZE` and typed members
//! - `sharemap_pack` / `sharemap_unpack` overloads between the two
//!
//! The wire layout is the one `Codec` uses, so frames produced on either
//! side decode on the other.

use std::fmt::Write;

use crate::codec::Layout;
use crate::schema::{SchemaTable, SCHEMA_HASH, STRING_SLOT_SIZE, UNIX_TIMESTAMP_NS};

const PREAMBLE: &str = r#"#pragma once

#include <climits>
#include <cstddef>
#include <cstdint>
#include <cstring>
#include <array>
#include <chrono>
#include <string_view>
#include <type_traits>

namespace anysignal {

static constexpr std::size_t STRING_BUFFER_SIZE = @STRING_SLOT_SIZE@;

template <typename T, std::enable_if_t<std::is_same_v<T, std::array<char, STRING_BUFFER_SIZE>>, bool> = true>
void sharemap_pack_field(const T &in, std::uint8_t *out)
{
    std::memset(out, 0, STRING_BUFFER_SIZE);
    // Last byte stays nul.
    std::memcpy(out, in.data(), in.max_size() - 1);
}

template <typename T, std::enable_if_t<std::is_same_v<T, bool>, bool> = true>
void sharemap_pack_field(const T &in, std::uint8_t *out)
{
    *out = in ? 1 : 0;
}

template <typename T, std::enable_if_t<std::is_integral_v<T> and not std::is_same_v<T, bool>, bool> = true>
void sharemap_pack_field(const T &in, std::uint8_t *out)
{
    for (std::size_t i = 0; i < sizeof(T); ++i)
    {
        out[i] = std::uint8_t(in >> ((sizeof(T) - i - 1) * CHAR_BIT) & 0xFF);
    }
}

template <typename T, std::enable_if_t<std::is_floating_point_v<T>, bool> = true>
void sharemap_pack_field(const T &in, std::uint8_t *out)
{
    std::memcpy(out, &in, sizeof(T));
}

template <typename T, std::enable_if_t<std::is_same_v<T, std::array<char, STRING_BUFFER_SIZE>>, bool> = true>
void sharemap_unpack_field(const std::uint8_t *in, T &out)
{
    std::memcpy(out.data(), in, out.max_size() - 1);
    out[out.max_size() - 1] = '\0';
}

template <typename T, std::enable_if_t<std::is_same_v<T, bool>, bool> = true>
void sharemap_unpack_field(const std::uint8_t *in, T &out)
{
    out = (*in) != 0;
}

template <typename T, std::enable_if_t<std::is_integral_v<T> and not std::is_same_v<T, bool>, bool> = true>
void sharemap_unpack_field(const std::uint8_t *in, T &out)
{
    out = T{};
    for (std::size_t i = 0; i < sizeof(T); ++i)
    {
        out |= T{in[i]} << ((sizeof(T) - i - 1) * CHAR_BIT);
    }
}

template <typename T, std::enable_if_t<std::is_floating_point_v<T>, bool> = true>
void sharemap_unpack_field(const std::uint8_t *in, T &out)
{
    std::memcpy(&out, in, sizeof(T));
}

[[nodiscard]] static inline std::int64_t time_ns_since_epoch(void)
{
    const auto ts = std::chrono::system_clock::now();
    return std::chrono::time_point_cast<std::chrono::nanoseconds>(ts).time_since_epoch().count();
}

#define anysignal_sharemap_pack_field(in, out, name) \
    anysignal::sharemap_pack_field(in.name, out.name)

#define anysignal_sharemap_unpack_field(in, out, name) \
    anysignal::sharemap_unpack_field(in.name, out.name)
"#;

/// Renders a header for the given sections, in the order given.
pub fn render_header(sections: &[(String, SchemaTable)]) -> String {
    let mut out = PREAMBLE.replace("@STRING_SLOT_SIZE@", &STRING_SLOT_SIZE.to_string());

    for (name, table) in sections {
        render_section(&mut out, name, table);
    }

    out.push_str("\n// Call a templated function on every sharemap\n");
    out.push_str("#define anysignal_sharemap_for_each(fcn, ...) {\\\n");
    for (name, _) in sections {
        let _ = writeln!(out, "        fcn<sharemap_{}_t>(__VA_ARGS__); \\", name);
    }
    out.push_str("    }\n\n} // namespace anysignal\n");
    out
}

// Writing into a String cannot fail, so write! results are discarded.
fn render_section(out: &mut String, name: &str, table: &SchemaTable) {
    let layout = Layout::compute(table);

    let _ = writeln!(out, "\n// {} sharemap binary over the wire format", name);
    let _ = writeln!(out, "struct sharemap_{}_packed_t\n{{", name);
    for placed in layout.fields() {
        let _ = writeln!(out, "    std::uint8_t {}[{}]{{}};", placed.name, placed.width);
    }
    out.push_str("} __attribute__((packed));\n\n");

    let _ = writeln!(out, "struct sharemap_{}_t\n{{", name);
    let _ = writeln!(out, "    static constexpr std::string_view NAME{{\"{}\"}};", name);
    let _ = writeln!(out, "    static constexpr std::uint64_t HASH{{{:#018x}}};", layout.version_id());
    let _ = writeln!(out, "    using packed_t = sharemap_{}_packed_t;", name);
    out.push_str("    static constexpr size_t PACKED_SIZE{sizeof(packed_t)};\n");
    for decl in table.fields() {
        out.push('\n');
        for line in decl.desc.lines().filter(|l| !l.trim().is_empty()) {
            let _ = writeln!(out, "    // {}", line.trim());
        }
        if let Some(unit) = &decl.unit {
            let _ = writeln!(out, "    // unit: {}", unit);
        }
        let init = match decl.name.as_str() {
            SCHEMA_HASH => "HASH",
            UNIX_TIMESTAMP_NS => "time_ns_since_epoch()",
            _ => "",
        };
        let _ = writeln!(out, "    {} {}{{{}}};", decl.field_type.cpp_type(), decl.name, init);
    }
    out.push_str("};\n\n");
    let _ = writeln!(
        out,
        "static_assert(sizeof(sharemap_{}_packed_t) == {});\n",
        name,
        layout.frame_length()
    );

    let _ = writeln!(
        out,
        "static inline sharemap_{0}_packed_t sharemap_pack(sharemap_{0}_t &in)\n{{",
        name
    );
    out.push_str("    in.unix_timestamp_ns = time_ns_since_epoch();\n");
    let _ = writeln!(out, "    sharemap_{}_packed_t out{{}};", name);
    for placed in layout.fields() {
        let _ = writeln!(out, "    anysignal_sharemap_pack_field(in, out, {});", placed.name);
    }
    out.push_str("    return out;\n}\n\n");

    let _ = writeln!(
        out,
        "static inline sharemap_{0}_t sharemap_unpack(const sharemap_{0}_packed_t &in)\n{{",
        name
    );
    let _ = writeln!(out, "    sharemap_{}_t out{{}};", name);
    for placed in layout.fields() {
        let _ = writeln!(out, "    anysignal_sharemap_unpack_field(in, out, {});", placed.name);
    }
    out.push_str("    return out;\n}\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::build_schema;
    use serde_json::json;

    fn sections() -> Vec<(String, SchemaTable)> {
        let config = build_schema(&json!({
            "gain_db": { "type": "f32", "desc": "Gain", "unit": "dB" },
            "mode": { "type": "string", "desc": "Modulation" }
        }))
        .unwrap();
        let metrics = build_schema(&json!({
            "rx_packets": { "type": "u64", "desc": "Received packets" }
        }))
        .unwrap();
        vec![("config".to_string(), config), ("metrics".to_string(), metrics)]
    }

    #[test]
    fn test_header_structure() {
        let sections = sections();
        let header = render_header(&sections);
        let hash = Layout::compute(&sections[0].1).version_id();

        assert!(header.starts_with("#pragma once"));
        assert!(header.contains("static constexpr std::size_t STRING_BUFFER_SIZE = 64;"));
        assert!(header.contains("struct sharemap_config_packed_t"));
        assert!(header.contains("    std::uint8_t gain_db[4]{};"));
        assert!(header.contains("    std::uint8_t mode[64]{};"));
        assert!(header.contains(&format!("static constexpr std::uint64_t HASH{{{:#018x}}};", hash)));
        assert!(header.contains("    std::uint64_t schema_hash{HASH};"));
        assert!(header.contains("    std::array<char, STRING_BUFFER_SIZE> mode{};"));
        assert!(header.contains("    // unit: dB"));
        assert!(header.contains("static_assert(sizeof(sharemap_config_packed_t) == 86);"));
        assert!(header.contains("    anysignal_sharemap_pack_field(in, out, gain_db);"));
        assert!(header.contains("    anysignal_sharemap_unpack_field(in, out, rx_packets);"));
        assert!(header.trim_end().ends_with("} // namespace anysignal"));
    }

    #[test]
    fn test_for_each_lists_sections_in_order() {
        let header = render_header(&sections());
        let config = header.find("fcn<sharemap_config_t>").unwrap();
        let metrics = header.find("fcn<sharemap_metrics_t>").unwrap();
        assert!(config < metrics);
    }
}
