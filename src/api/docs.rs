/// Generate comprehensive Markdown documentation for the RoomGi API.
pub fn generate_markdown_docs() -> String {
    let mut markdown = String::new();

    // Header
    markdown.push_str("# RoomGi API Documentation\n\n");
    markdown.push_str("## Overview\n\n");
    markdown.push_str("RoomGi is a student-housing rental marketplace. Tenants browse and book listings, owners publish and manage properties, and admins moderate users, properties and reports. This API provides endpoints for authentication, profiles, listings, bookings, the verification workflow, reports and the admin console.\n\n");

    // Table of Contents
    markdown.push_str("## Table of Contents\n\n");
    markdown.push_str("- [Authentication](#authentication)\n");
    markdown.push_str("- [Profile](#profile)\n");
    markdown.push_str("- [Verification](#verification)\n");
    markdown.push_str("- [Properties](#properties)\n");
    markdown.push_str("- [Bookings](#bookings)\n");
    markdown.push_str("- [Reports](#reports)\n");
    markdown.push_str("- [Notifications](#notifications)\n");
    markdown.push_str("- [Admin Console](#admin-console)\n");
    markdown.push_str("- [Error Codes](#error-codes)\n\n");

    // Conventions
    markdown.push_str("## Conventions\n\n");
    markdown.push_str("Every response uses the envelope:\n\n");
    markdown.push_str("```json\n{\n  \"success\": true,\n  \"data\": { },\n  \"message\": \"OK\"\n}\n```\n\n");
    markdown.push_str("Authenticated endpoints expect a JWT in the Authorization header:\n\n");
    markdown.push_str("```http\nAuthorization: Bearer <your-jwt-token>\n```\n\n");

    // Base URL
    markdown.push_str("## Base URL\n\n");
    markdown.push_str("```\nhttp://localhost:8080/api\n```\n\n");

    // Authentication
    markdown.push_str("## Authentication\n\n");

    markdown.push_str("### POST /api/auth/register\n\n");
    markdown.push_str("**Description:** Register a tenant or owner account (admin accounts come from the console)\n\n");
    markdown.push_str("**Request Body:**\n```json\n{\n  \"email\": \"student@uni.edu\",\n  \"full_name\": \"Ada Student\",\n  \"password\": \"Secure1Password\",\n  \"role\": \"tenant\",\n  \"phone_number\": \"+32470123456\",\n  \"city\": \"Leuven\"\n}\n```\n\n");

    markdown.push_str("### POST /api/auth/login\n\n");
    markdown.push_str("**Description:** Authenticate and receive a JWT\n\n");
    markdown.push_str("**Request Body:**\n```json\n{\n  \"email\": \"student@uni.edu\",\n  \"password\": \"Secure1Password\"\n}\n```\n\n");
    markdown.push_str("**Response data:** `{\"token\": \"jwt\", \"expires_in\": 86400, \"user\": { }}`\n\n");

    markdown.push_str("### POST /api/auth/validate, /api/auth/refresh, /api/auth/logout, /api/auth/logout-all\n\n");
    markdown.push_str("**Description:** Session lifecycle. Each takes `{\"token\": \"jwt\"}`.\n\n");

    // Profile
    markdown.push_str("## Profile\n\n");
    markdown.push_str("### GET /api/profile\n\n");
    markdown.push_str("**Description:** Current user's profile\n\n");
    markdown.push_str("### PUT /api/profile\n\n");
    markdown.push_str("**Request Body:**\n```json\n{\n  \"full_name\": \"Ada S.\",\n  \"phone_number\": \"+32470123456\",\n  \"city\": \"Ghent\"\n}\n```\n\n");
    markdown.push_str("### POST /api/profile/change-password\n\n");
    markdown.push_str("**Request Body:** `{\"current_password\": \"...\", \"new_password\": \"...\"}`\n\n");

    // Verification
    markdown.push_str("## Verification\n\n");
    markdown.push_str("Subjects move `unverified → pending` on a valid document submission, then `approved` or `rejected` on an admin decision. A rejected subject may resubmit, which clears the rejection reason. An approved subject cannot resubmit.\n\n");

    markdown.push_str("### GET /api/profile/verification\n\n");
    markdown.push_str("**Description:** Own identity verification state, including uploaded documents\n\n");

    markdown.push_str("### POST /api/profile/verification/documents\n\n");
    markdown.push_str("**Description:** Submit identity documents (multipart form)\n\n");
    markdown.push_str("**Form fields:** repeated `documents` file parts with parallel `documentTypes` labels. At least 2 documents. Accepted types: `government_id`, `student_id`, `selfie`.\n\n");

    markdown.push_str("### GET /api/properties/{id}/verification\n\n");
    markdown.push_str("**Description:** Verification state of an owned listing\n\n");

    markdown.push_str("### POST /api/properties/{id}/verification/documents\n\n");
    markdown.push_str("**Description:** Submit ownership documents for a listing (multipart form)\n\n");
    markdown.push_str("**Form fields:** as above. At least 2 documents, and the set must include one `ownership_proof` and one `government_id`.\n\n");

    // Properties
    markdown.push_str("## Properties\n\n");

    markdown.push_str("### GET /api/properties\n\n");
    markdown.push_str("**Description:** Public search. Only approved, active listings appear.\n\n");
    markdown.push_str("**Query:** `city`, `property_type`, `min_rent`, `max_rent`, `page`, `limit`\n\n");

    markdown.push_str("### POST /api/properties\n\n");
    markdown.push_str("**Description:** Create a listing (owner accounts only). New listings stay hidden until verified.\n\n");
    markdown.push_str("**Request Body:**\n```json\n{\n  \"title\": \"Sunny room near campus\",\n  \"description\": \"South-facing room in a shared house.\",\n  \"property_type\": \"room\",\n  \"city\": \"Leuven\",\n  \"address\": \"Naamsestraat 22\",\n  \"monthly_rent\": 450,\n  \"security_deposit\": 900,\n  \"bedrooms\": 1,\n  \"amenities\": [\"wifi\"]\n}\n```\n\n");

    markdown.push_str("### GET /api/properties/{id}\n\n");
    markdown.push_str("**Description:** Public detail view (approved + active listings only)\n\n");

    markdown.push_str("### PUT /api/properties/{id}, DELETE /api/properties/{id}\n\n");
    markdown.push_str("**Description:** Owner-only update and delete. Deleting removes stored images from the object store.\n\n");

    markdown.push_str("### GET /api/properties/mine\n\n");
    markdown.push_str("**Description:** All of the caller's own listings, whatever their verification status\n\n");

    markdown.push_str("### POST /api/properties/{id}/images\n\n");
    markdown.push_str("**Description:** Upload listing photos (multipart form, `images` file parts)\n\n");

    // Bookings
    markdown.push_str("## Bookings\n\n");

    markdown.push_str("### POST /api/bookings\n\n");
    markdown.push_str("**Request Body:**\n```json\n{\n  \"property_id\": \"uuid\",\n  \"check_in\": \"2025-09-01\",\n  \"check_out\": \"2026-06-30\"\n}\n```\n\n");
    markdown.push_str("`check_in` must be before `check_out`; the property must be approved and active.\n\n");

    markdown.push_str("### GET /api/bookings, GET /api/bookings/owner\n\n");
    markdown.push_str("**Description:** Bookings as tenant, and bookings on the caller's listings\n\n");

    markdown.push_str("### POST /api/bookings/{id}/confirm, POST /api/bookings/{id}/cancel\n\n");
    markdown.push_str("**Description:** Owner confirms a pending booking; tenant or owner cancels\n\n");

    // Reports
    markdown.push_str("## Reports\n\n");

    markdown.push_str("### POST /api/reports\n\n");
    markdown.push_str("**Description:** Flag a user or a listing for moderation\n\n");
    markdown.push_str("**Request Body:**\n```json\n{\n  \"targetModel\": \"Property\",\n  \"targetId\": \"uuid\",\n  \"reason\": \"fraud\",\n  \"message\": \"Asks for a deposit before any viewing\"\n}\n```\n\n");
    markdown.push_str("Reasons: `spam`, `fraud`, `harassment`, `false_information`, `other`.\n\n");

    // Notifications
    markdown.push_str("## Notifications\n\n");
    markdown.push_str("### GET /api/notifications\n\n");
    markdown.push_str("### POST /api/notifications/{id}/mark-read\n\n");
    markdown.push_str("### POST /api/notifications/mark-all-read\n\n");
    markdown.push_str("Notifications are written when a verification is decided or a report is closed.\n\n");

    // Admin
    markdown.push_str("## Admin Console\n\n");
    markdown.push_str("All admin endpoints require an admin JWT and answer 403 otherwise.\n\n");

    markdown.push_str("### GET /api/admin/users\n\n");
    markdown.push_str("**Query:** `search`, `role`, `verification_status`, `blocked`, `page`, `limit`\n\n");

    markdown.push_str("### POST /api/admin/users/{id}/block, POST /api/admin/users/{id}/unblock\n\n");
    markdown.push_str("**Description:** Block switch. Independent of any report; closing a report never blocks anyone by itself.\n\n");

    markdown.push_str("### GET /api/admin/properties\n\n");
    markdown.push_str("**Query:** `search`, `city`, `verification_status`, `page`, `limit`\n\n");

    markdown.push_str("### GET /api/admin/verification/users, GET /api/admin/verification/properties\n\n");
    markdown.push_str("**Description:** Pending verification queues with documents and owner metadata\n\n");

    markdown.push_str("### POST /api/admin/verification/users/{id}/decide, POST /api/admin/verification/properties/{id}/decide\n\n");
    markdown.push_str("**Request Body:**\n```json\n{\n  \"status\": \"rejected\",\n  \"reason\": \"blurry ID\"\n}\n```\n\n");
    markdown.push_str("`reason` is required when rejecting and ignored when approving.\n\n");

    markdown.push_str("### GET /api/admin/reports\n\n");
    markdown.push_str("**Query:** `target_model`, `status`, `page`, `limit`\n\n");

    markdown.push_str("### POST /api/admin/reports/{id}/status\n\n");
    markdown.push_str("**Request Body:** `{\"status\": \"resolved\"}` or `{\"status\": \"dismissed\"}`. Only a pending report can move.\n\n");

    markdown.push_str("### GET /api/admin/stats\n\n");
    markdown.push_str("**Description:** Platform counters (users, properties, pending verifications, open reports)\n\n");

    // Error codes
    markdown.push_str("## Error Codes\n\n");
    markdown.push_str("| Status | Meaning |\n");
    markdown.push_str("|--------|---------|\n");
    markdown.push_str("| 400 | Validation error (missing rejection reason, too few documents, malformed body) |\n");
    markdown.push_str("| 401 | Missing, invalid or revoked token |\n");
    markdown.push_str("| 403 | Authorization error (not the owner, not an admin) |\n");
    markdown.push_str("| 404 | Subject, report or booking not found |\n");
    markdown.push_str("| 429 | Rate limit exceeded |\n");
    markdown.push_str("| 502 | Object storage or geocoder failure |\n");
    markdown.push_str("| 500 | Unexpected server error |\n\n");

    markdown
}

/// Generate the landing page for the documentation endpoints.
pub fn generate_documentation_html() -> String {
    r#"<!DOCTYPE html>
<html>
<head>
    <title>RoomGi API</title>
    <meta charset="utf-8"/>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 0;
            padding: 2rem;
            background: #f7f7f9;
            color: #222;
        }
        .container {
            max-width: 860px;
            margin: 0 auto;
            background: #fff;
            border-radius: 8px;
            padding: 2rem 2.5rem;
            box-shadow: 0 1px 4px rgba(0,0,0,0.08);
        }
        h1 { margin-top: 0; }
        a { color: #2463eb; text-decoration: none; }
        a:hover { text-decoration: underline; }
        table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
        th, td { text-align: left; padding: 0.5rem 0.75rem; border-bottom: 1px solid #e5e7eb; }
        code { background: #f1f5f9; padding: 0.1rem 0.35rem; border-radius: 4px; }
        .pill { display: inline-block; padding: 0.1rem 0.5rem; border-radius: 999px; background: #eef2ff; font-size: 0.8rem; }
    </style>
</head>
<body>
    <div class="container">
        <h1>🏠 RoomGi API</h1>
        <p>Student-housing rental marketplace backend: listings, bookings, identity and ownership verification, reports and the admin console.</p>

        <h2>Interactive documentation</h2>
        <table>
            <tr><th>Resource</th><th>URL</th></tr>
            <tr><td>Swagger UI</td><td><a href="/api/docs">/api/docs</a></td></tr>
            <tr><td>Redoc</td><td><a href="/api/redoc">/api/redoc</a></td></tr>
            <tr><td>OpenAPI JSON</td><td><a href="/docs/openapi.json">/docs/openapi.json</a></td></tr>
            <tr><td>Markdown export</td><td><a href="/docs/markdown">/docs/markdown</a></td></tr>
        </table>

        <h2>Endpoint groups</h2>
        <table>
            <tr><th>Group</th><th>Base path</th><th>Notes</th></tr>
            <tr><td>Auth</td><td><code>/api/auth</code></td><td>register, login, validate, refresh, logout</td></tr>
            <tr><td>Profile</td><td><code>/api/profile</code></td><td>profile, password, identity verification</td></tr>
            <tr><td>Properties</td><td><code>/api/properties</code></td><td>public search, owner CRUD, images, ownership verification</td></tr>
            <tr><td>Bookings</td><td><code>/api/bookings</code></td><td>request, confirm, cancel</td></tr>
            <tr><td>Reports</td><td><code>/api/reports</code></td><td>flag a user or listing</td></tr>
            <tr><td>Notifications</td><td><code>/api/notifications</code></td><td>moderation outcomes</td></tr>
            <tr><td>Admin</td><td><code>/api/admin</code></td><td><span class="pill">admin JWT</span> queues, decisions, reports, directory, stats</td></tr>
        </table>

        <h2>Verification lifecycle</h2>
        <p><code>unverified → pending</code> on a valid document submission, then <code>approved</code> or <code>rejected</code> by an admin. Rejected subjects may resubmit; approved subjects may not. Only approved, active listings are publicly visible.</p>
    </div>
</body>
</html>
"#
    .to_string()
}
