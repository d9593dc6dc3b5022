//! Restaurant schema: customers, staff, dishes, ingredients and orders.

use crate::schema::{EntityDescriptor, FieldDescriptor, Identifier, SchemaBinding};

pub static CLIENTE: EntityDescriptor = EntityDescriptor {
    name: "Cliente",
    resource: "clientes_restaurante",
    binding: SchemaBinding::Restaurante,
    table: "cliente",
    identifier: Identifier::Serial { column: "id_cliente" },
    fields: &[
        FieldDescriptor::text("nombre", "Nombre", 100),
        FieldDescriptor::email("correo_electronico", "Correo Electrónico", 100).unique(),
        FieldDescriptor::text("telefono", "Teléfono", 15),
    ],
};

pub static EMPLEADO: EntityDescriptor = EntityDescriptor {
    name: "Empleado",
    resource: "empleados",
    binding: SchemaBinding::Restaurante,
    table: "empleado",
    identifier: Identifier::Serial { column: "id_empleado" },
    fields: &[
        FieldDescriptor::text("nombre", "Nombre", 100),
        FieldDescriptor::text("posicion", "Posición", 50),
        FieldDescriptor::datetime("fecha_contratacion", "Fecha de Contratación"),
    ],
};

pub static PLATO: EntityDescriptor = EntityDescriptor {
    name: "Plato",
    resource: "platos",
    binding: SchemaBinding::Restaurante,
    table: "plato",
    identifier: Identifier::Serial { column: "id_platillo" },
    fields: &[
        FieldDescriptor::text("nombre", "Nombre", 100),
        FieldDescriptor::integer("cantidad_disponible", "Cantidad Disponible"),
        FieldDescriptor::text("unidad_medida", "Unidad de Medida", 20),
    ],
};

pub static INGREDIENTE: EntityDescriptor = EntityDescriptor {
    name: "Ingrediente",
    resource: "ingredientes",
    binding: SchemaBinding::Restaurante,
    table: "ingrediente",
    identifier: Identifier::Serial { column: "id_ingrediente" },
    fields: &[
        FieldDescriptor::text("nombre", "Nombre", 100),
        FieldDescriptor::integer("cantidad_disponible", "Cantidad Disponible"),
        FieldDescriptor::text("unidad_medida", "Unidad de Medida", 20),
    ],
};

pub static PEDIDO: EntityDescriptor = EntityDescriptor {
    name: "Pedido",
    resource: "pedidos",
    binding: SchemaBinding::Restaurante,
    table: "pedido",
    identifier: Identifier::Serial { column: "id_pedido" },
    fields: &[
        FieldDescriptor::integer("id_cliente", "ID Cliente").references("cliente", "id_cliente"),
        FieldDescriptor::integer("id_empleado", "ID Empleado").references("empleado", "id_empleado"),
        FieldDescriptor::datetime("fecha_hora", "Fecha y Hora"),
    ],
};

pub static ENTITIES: [&EntityDescriptor; 5] = [&CLIENTE, &EMPLEADO, &PLATO, &INGREDIENTE, &PEDIDO];
